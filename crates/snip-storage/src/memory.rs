mod links;
mod pending;
mod users;

pub use links::InMemoryRepository;
pub use pending::InMemoryPendingStore;
pub use users::InMemoryUserRepository;
