use crate::authenticator::{Authenticator, RegisterParams, SessionUser};
use crate::error::{AuthError, Result};
use crate::{otp, password};
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use snip_core::{
    Mail, Mailer, PendingRegistration, PendingRegistrationStore, StorageError, UserRepository,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How long a registration waits for its one-time password.
pub const PENDING_TTL: SignedDuration = SignedDuration::from_mins(10);

const OTP_SUBJECT: &str = "Your OTP Code";

/// A concrete implementation of the [`Authenticator`] trait.
#[derive(Debug)]
pub struct AuthService<U, P, M> {
    users: Arc<U>,
    pending: Arc<P>,
    mailer: Arc<M>,
    pending_ttl: SignedDuration,
}

impl<U, P, M> AuthService<U, P, M>
where
    U: UserRepository,
    P: PendingRegistrationStore,
    M: Mailer,
{
    pub fn new(users: U, pending: P, mailer: M) -> Self {
        Self {
            users: Arc::new(users),
            pending: Arc::new(pending),
            mailer: Arc::new(mailer),
            pending_ttl: PENDING_TTL,
        }
    }

    /// Overrides how long a pending registration stays valid.
    pub fn with_pending_ttl(mut self, ttl: SignedDuration) -> Self {
        self.pending_ttl = ttl;
        self
    }

    fn otp_mail(&self, to: &str, otp: &str) -> Mail {
        Mail {
            to: to.to_string(),
            subject: OTP_SUBJECT.to_string(),
            body: format!(
                "Your OTP code is {otp}. It expires in {} minutes.",
                self.pending_ttl.as_mins()
            ),
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}

/// Rejects addresses that could never be delivered to before any mail is sent.
fn email_address(value: &str) -> Result<&str> {
    let email = required("email", value)?;
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !well_formed {
        return Err(AuthError::InvalidInput(format!("{email} is not an email address")));
    }
    Ok(email)
}

#[async_trait]
impl<U, P, M> Authenticator for AuthService<U, P, M>
where
    U: UserRepository,
    P: PendingRegistrationStore,
    M: Mailer,
{
    async fn register(&self, params: RegisterParams) -> Result<String> {
        let username = required("username", &params.username)?;
        let email = email_address(&params.email)?;
        if params.password.is_empty() {
            return Err(AuthError::InvalidInput("password is required".to_string()));
        }

        if self.users.find_by_email(email).await?.is_some() {
            debug!(email, "registration refused: email already registered");
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = password::hash(params.password.clone()).await?;
        let otp_code = otp::generate();

        // Nothing is stored until the code has actually left.
        self.mailer.send(self.otp_mail(email, &otp_code)).await?;

        let token = Uuid::new_v4().to_string();
        let pending = PendingRegistration {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            otp_code,
            expires_at: Timestamp::now() + self.pending_ttl,
        };
        self.pending.put(&token, pending).await?;

        info!(email, "registration pending verification");
        Ok(token)
    }

    async fn has_pending(&self, token: &str) -> Result<bool> {
        Ok(self.pending.get(token).await?.is_some())
    }

    async fn verify_otp(&self, token: &str, otp: &str) -> Result<SessionUser> {
        let Some(pending) = self.pending.get(token).await? else {
            return Err(AuthError::NoPendingRegistration);
        };

        if pending.otp_code != otp.trim() {
            warn!(email = %pending.email, "one-time password mismatch");
            return Err(AuthError::InvalidOtp);
        }

        let user = pending.into_user();
        let session = SessionUser {
            username: user.username.clone(),
            email: user.email.clone(),
        };

        // The pending entry outlives a failed insert so the same code can be retried.
        match self.users.insert(user).await {
            Ok(()) => {}
            Err(StorageError::Conflict(_)) => {
                self.pending.take(token).await?;
                return Err(AuthError::EmailAlreadyRegistered);
            }
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = self.pending.take(token).await {
            warn!(
                email = %session.email,
                error = %e,
                "verified registration left pending until expiry"
            );
        }

        info!(email = %session.email, "registration verified");
        Ok(session)
    }

    async fn login(&self, email: &str, password: &str) -> Result<SessionUser> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            debug!(email, "login refused: unknown email");
            return Err(AuthError::EmailNotRegistered);
        };

        if !password::verify(password.to_string(), user.password_hash.clone()).await? {
            debug!(email = %user.email, "login refused: wrong password");
            return Err(AuthError::InvalidPassword);
        }

        info!(email = %user.email, "user signed in");
        Ok(SessionUser {
            username: user.username,
            email: user.email,
        })
    }
}
