use async_trait::async_trait;
use snip_core::{Mail, MailError, Mailer};
use tracing::info;

/// A development transport that logs messages instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "mail not sent (log transport)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_accepts_everything() {
        let mail = Mail {
            to: "a@example.com".to_string(),
            subject: "Your OTP Code".to_string(),
            body: "Your OTP code is 123456.".to_string(),
        };

        assert!(LogMailer.send(mail).await.is_ok());
    }
}
