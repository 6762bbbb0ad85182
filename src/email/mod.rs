pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

pub const PASSWORD_RESET_SUBJECT: &str = "Reset Password";

pub type DynMailer = Arc<dyn Mailer>;

/// Outbound mail capability used by the reset flow.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to_email: &str, reset_link: &str) -> Result<(), String>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(to.parse().map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to_email: &str, reset_link: &str) -> Result<(), String> {
        let html = templates::render_password_reset(reset_link);
        self.send(to_email, PASSWORD_RESET_SUBJECT, &html).await
    }
}

/// Stand-in used when SMTP is not configured. The link is written to the log
/// so a developer can still complete the flow.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to_email: &str, reset_link: &str) -> Result<(), String> {
        tracing::warn!(
            to = %to_email,
            link = %reset_link,
            "SMTP not configured, password reset email not sent"
        );
        Ok(())
    }
}

/// Pick the SMTP mailer when configured, falling back to [`LogMailer`].
pub fn from_config(smtp: Option<&SmtpConfig>) -> DynMailer {
    match smtp.map(SmtpMailer::new) {
        Some(Ok(mailer)) => {
            tracing::info!("SMTP configured");
            Arc::new(mailer)
        }
        Some(Err(e)) => {
            tracing::warn!("SMTP not available: {e}");
            Arc::new(LogMailer)
        }
        None => Arc::new(LogMailer),
    }
}
