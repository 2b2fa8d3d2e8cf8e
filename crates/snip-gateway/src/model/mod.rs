mod auth;
mod health;
mod link;
mod page;

pub use auth::{LoginForm, OtpForm, RegisterForm};
pub use health::HealthResponse;
pub use link::{LinkView, ShortenForm, ShortenResponse};
pub use page::{DashboardResponse, DisplayResponse, LandingResponse, LoginPage, VerifyOtpPage};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
}
