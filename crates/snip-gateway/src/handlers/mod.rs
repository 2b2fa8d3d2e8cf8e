mod auth;
mod health;
mod home;
mod links;
mod redirect;

pub use auth::{
    login_handler, login_page_handler, logout_handler, register_handler, verify_otp_handler,
    verify_otp_page_handler,
};
pub use health::health_handler;
pub use home::{dashboard_handler, display_handler, landing_handler};
pub use links::{delete_link_handler, shorten_handler};
pub use redirect::redirect_handler;
