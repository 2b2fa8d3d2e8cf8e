use axum::extract::State;
use axum::Json;
use axum_extra::extract::PrivateCookieJar;
use snip_core::LinkScope;

use crate::error::Result;
use crate::model::{DashboardResponse, DisplayResponse, LandingResponse, LinkView};
use crate::session::{self, SignedIn};
use crate::state::AppState;

pub async fn landing_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Json<LandingResponse>)> {
    let total_links = state.shortener().count(LinkScope::All).await?;
    let user = session::current_user(&jar);
    let (jar, flash) = session::take_flash(jar);

    Ok((
        jar,
        Json(LandingResponse {
            total_links,
            user,
            flash,
        }),
    ))
}

/// Lists the links created without an account.
pub async fn display_handler(State(state): State<AppState>) -> Result<Json<DisplayResponse>> {
    let records = state.shortener().list(LinkScope::Anonymous).await?;
    let total_links = records.len() as u64;
    let links = records
        .into_iter()
        .map(|r| LinkView::from_record(r, state.base_url()))
        .collect();

    Ok(Json(DisplayResponse { links, total_links }))
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Json<DashboardResponse>)> {
    let scope = LinkScope::Owner(&user.email);
    let records = state.shortener().list(scope).await?;
    let total_links = state.shortener().count(scope).await?;
    let links = records
        .into_iter()
        .map(|r| LinkView::from_record(r, state.base_url()))
        .collect();
    let (jar, flash) = session::take_flash(jar);

    Ok((
        jar,
        Json(DashboardResponse {
            user,
            links,
            total_links,
            flash,
        }),
    ))
}
