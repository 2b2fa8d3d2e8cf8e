//! Cookie-backed session state.
//!
//! Three private (encrypted and authenticated) cookies carry everything a
//! browser session holds: the signed-in user, the token of a registration
//! awaiting its OTP, and a one-shot flash message.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use snip_auth::{SessionUser, PENDING_TTL};
use std::future::Future;
use thiserror::Error;
use tracing::warn;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "snip_session";
pub const PENDING_COOKIE: &str = "snip_pending";
pub const FLASH_COOKIE: &str = "snip_flash";

/// Minimum length of the secret the cookie key is derived from.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
#[error("session secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
pub struct WeakSecret(pub usize);

/// Derives the cookie encryption key from the configured secret.
pub fn derive_key(secret: &[u8]) -> Result<Key, WeakSecret> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(WeakSecret(secret.len()));
    }
    Ok(Key::derive_from(secret))
}

fn cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

/// Returns the signed-in user, if any.
pub fn current_user(jar: &PrivateCookieJar) -> Option<SessionUser> {
    let raw = jar.get(SESSION_COOKIE)?;
    match serde_json::from_str(raw.value()) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable session cookie");
            None
        }
    }
}

pub fn sign_in(
    jar: PrivateCookieJar,
    user: &SessionUser,
    secure: bool,
) -> Result<PrivateCookieJar, AppError> {
    let value = serde_json::to_string(user).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(jar.add(cookie(SESSION_COOKIE, value, secure)))
}

pub fn sign_out(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(removal(SESSION_COOKIE))
}

pub fn pending_token(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(PENDING_COOKIE).map(|c| c.value().to_string())
}

/// Stores the pending registration token; the cookie lives as long as the registration.
pub fn set_pending(jar: PrivateCookieJar, token: String, secure: bool) -> PrivateCookieJar {
    let mut pending = cookie(PENDING_COOKIE, token, secure);
    pending.set_max_age(time::Duration::seconds(PENDING_TTL.as_secs()));
    jar.add(pending)
}

pub fn clear_pending(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(removal(PENDING_COOKIE))
}

/// Queues a message for the next page render.
pub fn flash(jar: PrivateCookieJar, message: impl Into<String>, secure: bool) -> PrivateCookieJar {
    jar.add(cookie(FLASH_COOKIE, message.into(), secure))
}

/// Consumes the queued flash message.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(c) => {
            let message = c.value().to_string();
            (jar.remove(removal(FLASH_COOKIE)), Some(message))
        }
        None => (jar, None),
    }
}

/// Extractor for routes that require a signed-in user; rejects with 401.
#[derive(Debug, Clone)]
pub struct SignedIn(pub SessionUser);

impl<S> FromRequestParts<S> for SignedIn
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = AppError;

    // Read the cookie synchronously so the returned future borrows nothing.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let jar = PrivateCookieJar::from_headers(&parts.headers, Key::from_ref(state));
        let user = current_user(&jar);

        async move { user.map(SignedIn).ok_or(AppError::Unauthenticated) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::generate())
    }

    fn alice() -> SessionUser {
        SessionUser {
            username: "alice".to_string(),
            email: "a@example.com".to_string(),
        }
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(derive_key(b"too short"), Err(WeakSecret(9))));
        assert!(derive_key(&[7u8; MIN_SECRET_LEN]).is_ok());
    }

    #[test]
    fn sign_in_then_out() {
        let jar = sign_in(jar(), &alice(), false).unwrap();
        assert_eq!(current_user(&jar), Some(alice()));

        let jar = sign_out(jar);
        assert_eq!(current_user(&jar), None);
    }

    #[test]
    fn flash_is_consumed_once() {
        let jar = flash(jar(), "hello", false);

        let (jar, message) = take_flash(jar);
        assert_eq!(message.as_deref(), Some("hello"));

        let (_jar, message) = take_flash(jar);
        assert_eq!(message, None);
    }

    #[test]
    fn pending_cookie_expires_with_registration() {
        let jar = set_pending(jar(), "token".to_string(), true);

        let cookie = jar.get(PENDING_COOKIE).unwrap();
        assert_eq!(cookie.value(), "token");
        assert_eq!(pending_token(&jar).as_deref(), Some("token"));

        let jar = clear_pending(jar);
        assert_eq!(pending_token(&jar), None);
    }
}
