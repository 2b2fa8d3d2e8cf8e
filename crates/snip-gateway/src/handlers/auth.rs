use axum::extract::State;
use axum::response::Redirect;
use axum::{Form, Json};
use axum_extra::extract::PrivateCookieJar;
use snip_auth::{AuthError, RegisterParams};
use tracing::debug;

use crate::error::Result;
use crate::model::{LoginForm, LoginPage, OtpForm, RegisterForm, VerifyOtpPage};
use crate::session;
use crate::state::AppState;

pub async fn register_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(PrivateCookieJar, Redirect)> {
    let token = state
        .auth()
        .register(RegisterParams {
            username: form.username,
            email: form.email,
            password: form.password,
        })
        .await?;

    let secure = state.secure_cookies();
    let jar = session::set_pending(jar, token, secure);
    let jar = session::flash(jar, "An OTP has been sent to your email.", secure);
    Ok((jar, Redirect::to("/verify-otp")))
}

pub async fn verify_otp_page_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Json<VerifyOtpPage>)> {
    let pending = match session::pending_token(&jar) {
        Some(token) => state.auth().has_pending(&token).await?,
        None => false,
    };
    let (jar, flash) = session::take_flash(jar);

    Ok((jar, Json(VerifyOtpPage { pending, flash })))
}

pub async fn verify_otp_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<OtpForm>,
) -> Result<(PrivateCookieJar, Redirect)> {
    let token = session::pending_token(&jar).ok_or(AuthError::NoPendingRegistration)?;
    let user = state.auth().verify_otp(&token, &form.otp).await?;
    debug!(email = %user.email, "registration completed over http");

    let jar = session::clear_pending(jar);
    let jar = session::flash(
        jar,
        "Registration successful! Please log in.",
        state.secure_cookies(),
    );
    Ok((jar, Redirect::to("/login")))
}

pub async fn login_page_handler(jar: PrivateCookieJar) -> (PrivateCookieJar, Json<LoginPage>) {
    let user = session::current_user(&jar);
    let (jar, flash) = session::take_flash(jar);

    (jar, Json(LoginPage { user, flash }))
}

pub async fn login_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(PrivateCookieJar, Redirect)> {
    let user = state.auth().login(&form.email, &form.password).await?;

    let secure = state.secure_cookies();
    let jar = session::sign_in(jar, &user, secure)?;
    let jar = session::flash(jar, format!("Welcome back, {}!", user.username), secure);
    Ok((jar, Redirect::to("/dashboard")))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let jar = session::sign_out(jar);
    let jar = session::flash(jar, "You have been logged out.", state.secure_cookies());
    (jar, Redirect::to("/login"))
}
