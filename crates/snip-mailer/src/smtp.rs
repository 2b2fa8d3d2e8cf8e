use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use snip_core::{Mail, MailError, Mailer};
use tracing::{debug, error};
use typed_builder::TypedBuilder;

/// Connection settings for an SMTP relay.
#[derive(Debug, Clone, TypedBuilder)]
pub struct SmtpConfig {
    #[builder(setter(into))]
    host: String,
    /// Implicit-TLS submission port.
    #[builder(default = 465)]
    port: u16,
    #[builder(setter(into))]
    username: String,
    #[builder(setter(into))]
    password: String,
    /// Sender address, e.g. `snip <no-reply@example.com>`.
    #[builder(setter(into))]
    from: String,
}

/// Sends mail through an authenticated SMTP relay over implicit TLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport. No connection is made until the first send.
    pub fn new(config: SmtpConfig) -> Result<Self, MailError> {
        let from = parse_mailbox(&config.from)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport, from })
    }

    fn message(&self, mail: Mail) -> Result<Message, MailError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| MailError::Message(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|e: lettre::address::AddressError| {
            MailError::InvalidAddress(format!("{address}: {e}"))
        })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let to = mail.to.clone();
        let message = self.message(mail)?;

        self.transport.send(message).await.map_err(|e| {
            error!(to = %to, error = %e, "smtp delivery failed");
            MailError::Transport(e.to_string())
        })?;

        debug!(to = %to, "mail delivered to relay");
        Ok(())
    }
}
