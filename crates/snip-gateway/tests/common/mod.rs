#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use axum_extra::extract::cookie::Key;
use serde_json::Value;
use tower::ServiceExt;

use snip_gateway::{App, AppState, Services};
use snip_storage::{InMemoryPendingStore, InMemoryRepository, InMemoryUserRepository};
use snip_test_infra::mailer::RecordingMailer;

pub const BASE_URL: &str = "http://sn.ip";

/// A browser-like client: drives the router in-process and keeps cookies.
pub struct TestClient {
    router: Router,
    cookies: BTreeMap<String, String>,
    pub mailer: RecordingMailer,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is json")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("response body is utf-8")
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestClient {
    pub fn new() -> Self {
        let mailer = RecordingMailer::new();
        let services = Services::new(
            InMemoryRepository::new(),
            InMemoryUserRepository::new(),
            InMemoryPendingStore::new(),
            mailer.clone(),
        );
        let state = AppState::builder()
            .services(services)
            .base_url(BASE_URL)
            .cookie_key(Key::generate())
            .build();

        Self {
            router: App::router(state),
            cookies: BTreeMap::new(),
            mailer,
        }
    }

    /// A second browser talking to the same server.
    pub fn fork(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookies: BTreeMap::new(),
            mailer: self.mailer.clone(),
        }
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        for set_cookie in headers.get_all(header::SET_COOKIE) {
            self.store_cookie(set_cookie.to_str().unwrap());
        }

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let mut attributes = set_cookie.split(';').map(str::trim);
        let Some((name, value)) = attributes.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let removed = value.is_empty()
            || attributes.any(|attr| attr.eq_ignore_ascii_case("Max-Age=0"));

        if removed {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }

    /// Registers and verifies an account, leaving the client signed out.
    pub async fn register(&mut self, username: &str, email: &str, password: &str) {
        let response = self
            .post_form(
                "/register",
                &[
                    ("username", username),
                    ("email", email),
                    ("password", password),
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);

        let otp = self.mailer.last_otp(email).expect("otp was mailed");
        let response = self.post_form("/verify-otp", &[("otp", &otp)]).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
    }

    pub async fn login(&mut self, email: &str, password: &str) {
        let response = self
            .post_form("/login", &[("email", email), ("password", password)])
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/dashboard"));
    }

    pub async fn shorten(&mut self, url: &str) -> TestResponse {
        self.post_form("/shorten", &[("url", url)]).await
    }
}
