use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    dashboard_handler, delete_link_handler, display_handler, health_handler, landing_handler,
    login_handler, login_page_handler, logout_handler, redirect_handler, register_handler,
    shorten_handler, verify_otp_handler, verify_otp_page_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(landing_handler))
            .route("/health", get(health_handler))
            .route("/display", get(display_handler))
            .route("/register", post(register_handler))
            .route(
                "/verify-otp",
                get(verify_otp_page_handler).post(verify_otp_handler),
            )
            .route("/login", get(login_page_handler).post(login_handler))
            .route("/logout", get(logout_handler))
            .route("/index", get(dashboard_handler))
            .route("/dashboard", get(dashboard_handler))
            .route("/shorten", post(shorten_handler))
            .route("/delete/{code}", post(delete_link_handler))
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
