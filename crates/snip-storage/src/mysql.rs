mod links;
mod pending;
mod users;

pub use links::MySqlRepository;
pub use pending::MySqlPendingStore;
pub use users::MySqlUserRepository;

use jiff::Timestamp;
use snip_core::error::{Result, StorageError};
use sqlx::MySqlPool;
use tracing::debug;

const SCHEMA: [(&str, &str); 3] = [
    ("short_links", include_str!("../ddl/mysql/short_links.sql")),
    ("users", include_str!("../ddl/mysql/users.sql")),
    (
        "pending_registrations",
        include_str!("../ddl/mysql/pending_registrations.sql"),
    ),
];

/// Opens a new MySQL connection pool.
pub async fn connect(database_url: &str) -> Result<MySqlPool> {
    MySqlPool::connect(database_url)
        .await
        .map_err(map_sqlx_error)
}

/// Creates the tables used by the MySQL backends if they do not exist yet.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    for (table, ddl) in SCHEMA {
        debug!(table, "ensuring mysql table");
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(())
}

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn parse_timestamp(column: &str, seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{seconds}': {e}"))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}
