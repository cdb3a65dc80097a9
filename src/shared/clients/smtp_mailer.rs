use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::mailer::{Mailer, OutgoingMail};
use crate::shared::config::MailConfig;

// SMTP 메일 클라이언트 (STARTTLS)
// SMTP mail client
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("Invalid SMTP host: {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let address: Address = config
            .from_address
            .parse()
            .with_context(|| format!("Invalid MAIL_FROM_ADDRESS: {}", config.from_address))?;

        Ok(Self {
            transport,
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let to: Mailbox = mail
            .recipient
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", mail.recipient))?;

        let body = mail.render_html()?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject())
            .header(ContentType::TEXT_HTML)
            .body(body)
            .context("Failed to build email")?;

        self.transport
            .send(message)
            .await
            .context("Failed to send email")?;

        tracing::info!(recipient = %mail.recipient, subject = mail.subject(), "Email sent");
        Ok(())
    }
}
