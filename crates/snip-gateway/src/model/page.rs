use serde::Serialize;
use snip_auth::SessionUser;

use super::LinkView;

#[derive(Serialize)]
pub struct LandingResponse {
    pub total_links: u64,
    pub user: Option<SessionUser>,
    pub flash: Option<String>,
}

#[derive(Serialize)]
pub struct DisplayResponse {
    pub links: Vec<LinkView>,
    pub total_links: u64,
}

#[derive(Serialize)]
pub struct VerifyOtpPage {
    pub pending: bool,
    pub flash: Option<String>,
}

#[derive(Serialize)]
pub struct LoginPage {
    pub user: Option<SessionUser>,
    pub flash: Option<String>,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub user: SessionUser,
    pub links: Vec<LinkView>,
    pub total_links: u64,
    pub flash: Option<String>,
}
