use anyhow::Result;
use async_trait::async_trait;
use tera::Context;

use crate::shared::utils::templates;

/// 메일 종류
/// Kind of transactional mail. Tokens here are plaintext; they only ever leave by mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailKind {
    EmailVerification { token: String, link: String },
    PasswordReset { reset_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub recipient: String,
    pub user_name: String,
    pub kind: MailKind,
}

impl OutgoingMail {
    pub fn subject(&self) -> &'static str {
        match self.kind {
            MailKind::EmailVerification { .. } => "Email Verification",
            MailKind::PasswordReset { .. } => "Password Reset Link",
        }
    }

    /// HTML 본문 렌더링 (값은 모두 HTML 이스케이프)
    /// Render the HTML body from the bundled templates
    pub fn render_html(&self) -> Result<String> {
        let mut context = Context::new();
        context.insert("user_name", &self.user_name);

        let template = match &self.kind {
            MailKind::EmailVerification { token, link } => {
                context.insert("verification_token", token);
                context.insert("verification_url", link);
                templates::EMAIL_VERIFICATION
            }
            MailKind::PasswordReset { reset_url } => {
                context.insert("reset_password_url", reset_url);
                templates::RESET_PASSWORD
            }
        };

        templates::render(template, &context)
    }
}

/// 메일 발송 인터페이스
/// Mail dispatch seam
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_mail_contains_token_and_escaped_name() {
        let mail = OutgoingMail {
            recipient: "jane@example.com".to_string(),
            user_name: "<Jane>".to_string(),
            kind: MailKind::EmailVerification {
                token: "abc123".to_string(),
                link: "http://localhost:5173/verify-email?token=abc123".to_string(),
            },
        };

        let html = mail.render_html().unwrap();
        assert_eq!(mail.subject(), "Email Verification");
        assert!(html.contains("abc123"));
        assert!(html.contains("&lt;Jane&gt;"));
        assert!(!html.contains("<Jane>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_reset_mail_escapes_query_separator() {
        let mail = OutgoingMail {
            recipient: "jane@example.com".to_string(),
            user_name: "Jane".to_string(),
            kind: MailKind::PasswordReset {
                reset_url: "http://x/reset-password?token=t&email=jane%40example.com".to_string(),
            },
        };

        let html = mail.render_html().unwrap();
        assert_eq!(mail.subject(), "Password Reset Link");
        assert!(html.contains("Hi Jane,"));
        assert!(html.contains("token=t&amp;email=jane%40example.com"));
    }

    #[test]
    fn test_name_cannot_inject_markup_or_template_syntax() {
        let mail = OutgoingMail {
            recipient: "jane@example.com".to_string(),
            user_name: "\"><script>alert(1)</script>{{ reset_password_url }}".to_string(),
            kind: MailKind::PasswordReset {
                reset_url: "http://x/reset-password?token=t".to_string(),
            },
        };

        let html = mail.render_html().unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&quot;"));
        // 값은 다시 템플릿으로 해석되지 않음
        assert!(html.contains("{{ reset_password_url }}"));
    }
}
