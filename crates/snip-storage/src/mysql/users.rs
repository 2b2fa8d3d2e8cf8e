use super::{is_unique_violation, map_sqlx_error, parse_timestamp};
use async_trait::async_trait;
use snip_core::error::{Result, StorageError};
use snip_core::{UserRecord, UserRepository};
use sqlx::{MySqlPool, Row};

/// MySQL user store. Email uniqueness is enforced by `uk_users_email`.
#[derive(Debug, Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            r#"
            SELECT username, email, password_hash, created_at
            FROM users
            WHERE email = ?
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Some(UserRecord {
            username: row.try_get("username").map_err(map_sqlx_error)?,
            email: row.try_get("email").map_err(map_sqlx_error)?,
            password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
            created_at: parse_timestamp("created_at", created_at)?,
        }))
    }

    async fn insert(&self, user: UserRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(user.email)),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
