use async_trait::async_trait;
use parking_lot::Mutex;
use snip_core::{Mail, MailError, Mailer};
use std::sync::Arc;

/// A mailer that keeps every message in memory instead of sending it.
///
/// Clones share the same outbox. Call [`fail_next`](Self::fail_next) to make
/// the next send return a transport error.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    outbox: Arc<Mutex<Vec<Mail>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every message sent so far.
    pub fn sent(&self) -> Vec<Mail> {
        self.outbox.lock().clone()
    }

    /// Returns the most recent message sent to `to`.
    pub fn last_to(&self, to: &str) -> Option<Mail> {
        self.outbox.lock().iter().rev().find(|m| m.to == to).cloned()
    }

    /// Extracts the six-digit one-time password from the most recent message to `to`.
    pub fn last_otp(&self, to: &str) -> Option<String> {
        self.last_to(to)?
            .body
            .split(|c: char| !c.is_ascii_digit())
            .find(|word| word.len() == 6)
            .map(str::to_string)
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock() = true;
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        let mut fail = self.fail_next.lock();
        if *fail {
            *fail = false;
            return Err(MailError::Transport("simulated transport failure".to_string()));
        }
        drop(fail);

        self.outbox.lock().push(mail);
        Ok(())
    }
}
