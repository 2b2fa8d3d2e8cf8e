use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use snip_core::ShortCode;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::state::AppState;

const NOT_FOUND_BODY: &str = "URL not found!";

/// Redirects a short code to its destination; anyone may follow any code.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    let Ok(code) = ShortCode::new(&code) else {
        return Ok(not_found());
    };

    let Some(record) = state.redirector().resolve(&code).await? else {
        return Ok(not_found());
    };

    // Destinations are stored unvalidated and may not be legal header values.
    let location = HeaderValue::try_from(record.original_url).map_err(|e| {
        warn!(code = %code, error = %e, "destination is not a valid Location header");
        AppError::Internal(format!("unusable destination for {code}"))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}
