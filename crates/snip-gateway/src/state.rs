use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use snip_auth::{AuthService, Authenticator};
use snip_core::{Mailer, PendingRegistrationStore, Repository, UserRepository};
use snip_generator::RandomGenerator;
use snip_redirector::{CachedRepository, MokaLinkCache, Redirector, RedirectorService};
use snip_shortener::{Shortener, ShortenerService};
use typed_builder::TypedBuilder;

/// The domain services behind the routes.
#[derive(Clone)]
pub struct Services {
    pub shortener: Arc<dyn Shortener>,
    pub redirector: Arc<dyn Redirector>,
    pub auth: Arc<dyn Authenticator>,
}

impl Services {
    /// Wires the services over one set of storage backends.
    ///
    /// The allocator and the resolver share a single cached link repository,
    /// so a delete evicts the code from the cache the resolver reads.
    pub fn new<R, U, P, M>(links: R, users: U, pending: P, mailer: M) -> Self
    where
        R: Repository,
        U: UserRepository,
        P: PendingRegistrationStore,
        M: Mailer,
    {
        let links = Arc::new(CachedRepository::new(links, MokaLinkCache::new()));

        Self {
            shortener: Arc::new(ShortenerService::new(
                Arc::clone(&links),
                RandomGenerator::new(),
            )),
            redirector: Arc::new(RedirectorService::new(links)),
            auth: Arc::new(AuthService::new(users, pending, mailer)),
        }
    }
}

#[derive(Clone, TypedBuilder)]
pub struct AppState {
    services: Services,
    #[builder(setter(into))]
    base_url: String,
    cookie_key: Key,
    #[builder(default)]
    secure_cookies: bool,
}

impl AppState {
    pub fn shortener(&self) -> &dyn Shortener {
        self.services.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.services.redirector.as_ref()
    }

    pub fn auth(&self) -> &dyn Authenticator {
        self.services.auth.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
