use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::gemini::RecipeGenerator;
use super::mailer::{MailKind, Mailer, OutgoingMail};

/// 발송된 메일을 기록하는 Mailer (테스트용)
/// Mailer that records every mail instead of sending it. Can be switched to fail.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().clone()
    }

    /// 해당 주소로 마지막 발송된 인증 토큰
    pub fn last_verification_token(&self, recipient: &str) -> Option<String> {
        self.sent.lock().iter().rev().find_map(|m| match &m.kind {
            MailKind::EmailVerification { token, .. } if m.recipient == recipient => {
                Some(token.clone())
            }
            _ => None,
        })
    }

    /// 해당 주소로 마지막 발송된 재설정 URL
    pub fn last_reset_url(&self, recipient: &str) -> Option<String> {
        self.sent.lock().iter().rev().find_map(|m| match &m.kind {
            MailKind::PasswordReset { reset_url } if m.recipient == recipient => {
                Some(reset_url.clone())
            }
            _ => None,
        })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("RecordingMailer: configured to fail");
        }
        // 실제 발송처럼 본문 렌더링까지 수행
        mail.render_html()?;
        self.sent.lock().push(mail.clone());
        Ok(())
    }
}

/// 미리 정한 응답을 순서대로 돌려주는 생성기 (테스트용)
/// Generator that replays queued replies and records the prompts it received
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().push_back(Ok(text.into()));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().push_back(Err(message.into()));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl RecipeGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());

        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => bail!("ScriptedGenerator: {}", message),
            None => bail!("ScriptedGenerator: no reply queued"),
        }
    }
}
