use super::{map_sqlx_error, now_unix_seconds, parse_timestamp};
use async_trait::async_trait;
use snip_core::error::Result;
use snip_core::{PendingRegistration, PendingRegistrationStore};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// MySQL pending registration store.
///
/// Reads only return rows whose `expires_at` is still in the future.
/// Expired rows are purged whenever a new registration is stored.
#[derive(Debug, Clone)]
pub struct MySqlPendingStore {
    pool: MySqlPool,
}

impl MySqlPendingStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_live(&self, token: &str) -> Result<Option<PendingRegistration>> {
        let row = sqlx::query(
            r#"
            SELECT username, email, password_hash, otp_code, expires_at
            FROM pending_registrations
            WHERE token = ?
              AND expires_at > ?
            LIMIT 1
            "#,
        )
        .bind(token)
        .bind(now_unix_seconds())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_pending).transpose()
    }
}

fn row_to_pending(row: &MySqlRow) -> Result<PendingRegistration> {
    let expires_at: i64 = row.try_get("expires_at").map_err(map_sqlx_error)?;

    Ok(PendingRegistration {
        username: row.try_get("username").map_err(map_sqlx_error)?,
        email: row.try_get("email").map_err(map_sqlx_error)?,
        password_hash: row.try_get("password_hash").map_err(map_sqlx_error)?,
        otp_code: row.try_get("otp_code").map_err(map_sqlx_error)?,
        expires_at: parse_timestamp("expires_at", expires_at)?,
    })
}

#[async_trait]
impl PendingRegistrationStore for MySqlPendingStore {
    async fn put(&self, token: &str, pending: PendingRegistration) -> Result<()> {
        sqlx::query("DELETE FROM pending_registrations WHERE expires_at <= ?")
            .bind(now_unix_seconds())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO pending_registrations
                (token, username, email, password_hash, otp_code, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                username = VALUES(username),
                email = VALUES(email),
                password_hash = VALUES(password_hash),
                otp_code = VALUES(otp_code),
                expires_at = VALUES(expires_at)
            "#,
        )
        .bind(token)
        .bind(&pending.username)
        .bind(&pending.email)
        .bind(&pending.password_hash)
        .bind(&pending.otp_code)
        .bind(pending.expires_at.as_second())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<PendingRegistration>> {
        self.fetch_live(token).await
    }

    async fn take(&self, token: &str) -> Result<Option<PendingRegistration>> {
        let Some(pending) = self.fetch_live(token).await? else {
            return Ok(None);
        };

        // Only the caller whose DELETE removes the row owns the registration.
        let result = sqlx::query(
            r#"
            DELETE FROM pending_registrations
            WHERE token = ?
              AND expires_at > ?
            "#,
        )
        .bind(token)
        .bind(now_unix_seconds())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((result.rows_affected() > 0).then_some(pending))
    }
}
