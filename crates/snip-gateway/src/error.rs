use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_auth::AuthError;
use snip_core::MailError;
use snip_redirector::RedirectorError;
use snip_shortener::ShortenerError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("sign in to continue")]
    Unauthenticated,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Redirector(#[from] RedirectorError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Shortener(e) => match e {
                ShortenerError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "invalid_url"),
                ShortenerError::CodeSpaceExhausted { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "code_space_exhausted")
                }
                ShortenerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
            },
            AppError::Redirector(RedirectorError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage")
            }
            AppError::Auth(e) => match e {
                AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                AuthError::EmailAlreadyRegistered => {
                    (StatusCode::CONFLICT, "email_already_registered")
                }
                AuthError::NoPendingRegistration => {
                    (StatusCode::BAD_REQUEST, "no_pending_registration")
                }
                AuthError::InvalidOtp => (StatusCode::UNAUTHORIZED, "invalid_otp"),
                AuthError::EmailNotRegistered => (StatusCode::NOT_FOUND, "email_not_registered"),
                AuthError::InvalidPassword => (StatusCode::UNAUTHORIZED, "invalid_password"),
                AuthError::Mail(MailError::InvalidAddress(_)) => {
                    (StatusCode::BAD_REQUEST, "invalid_input")
                }
                AuthError::Mail(_) => (StatusCode::BAD_GATEWAY, "mail_delivery"),
                AuthError::PasswordHash(_) | AuthError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal")
                }
            },
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    /// The message shown to the client. Server-side failures are not detailed.
    fn public_message(&self, status: StatusCode) -> String {
        match self {
            AppError::Auth(AuthError::Mail(MailError::InvalidAddress(_))) => {
                "the email address cannot receive mail".to_string()
            }
            AppError::Auth(AuthError::Mail(_)) => {
                "could not send the verification email, please try again".to_string()
            }
            _ if status.is_server_error() => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        if status.is_server_error() {
            error!(kind, error = %self, "request failed");
        }

        let body = ErrorResponse {
            kind,
            message: self.public_message(status),
        };
        (status, Json(body)).into_response()
    }
}
