//! Outbound mail transports.
//!
//! [`SmtpMailer`] delivers through an authenticated implicit-TLS SMTP relay;
//! [`LogMailer`] writes each message to the log instead, for local runs
//! without a mail server.

pub mod log;
pub mod smtp;

pub use log::LogMailer;
pub use smtp::{SmtpConfig, SmtpMailer};
