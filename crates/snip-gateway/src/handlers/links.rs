use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::{Form, Json};
use axum_extra::extract::PrivateCookieJar;
use snip_core::ShortCode;
use snip_shortener::ShortenParams;

use crate::error::{AppError, Result};
use crate::model::{ShortenForm, ShortenResponse};
use crate::session::{self, SignedIn};
use crate::state::AppState;

const ALREADY_SHORTENED: &str = "This URL has already been shortened.";

/// Shortens a URL for the signed-in user, or anonymously without a session.
pub async fn shorten_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<ShortenForm>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let owner = session::current_user(&jar).map(|user| user.email);

    let outcome = state
        .shortener()
        .shorten(ShortenParams {
            original_url: form.url,
            owner,
        })
        .await?;

    let record = outcome.record;
    let (status, message) = if outcome.reused {
        (StatusCode::OK, Some(ALREADY_SHORTENED.to_string()))
    } else {
        (StatusCode::CREATED, None)
    };

    Ok((
        status,
        Json(ShortenResponse {
            short_url: record.code.to_url(state.base_url()),
            short_code: record.code.to_string(),
            original_url: record.original_url,
            message,
        }),
    ))
}

pub async fn delete_link_handler(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Path(code): Path<String>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Redirect)> {
    let not_found = || AppError::NotFound("URL not found!".to_string());

    let code = ShortCode::new(&code).map_err(|_| not_found())?;
    if !state.shortener().delete(&code, &user.email).await? {
        return Err(not_found());
    }

    let jar = session::flash(jar, "URL deleted successfully.", state.secure_cookies());
    Ok((jar, Redirect::to("/dashboard")))
}
