use super::{is_unique_violation, map_sqlx_error, parse_timestamp};
use async_trait::async_trait;
use snip_core::error::{Result, StorageError};
use snip_core::{LinkRecord, LinkScope, ReadRepository, Repository, ShortCode};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// MySQL implementation of the link repository.
///
/// The `uk_short_links_code` unique index (binary collation, so codes stay
/// case-sensitive) is what makes code allocation safe across concurrent
/// writers: a losing insert surfaces as [`StorageError::Conflict`].
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn row_to_record(row: &MySqlRow) -> Result<LinkRecord> {
    let code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let owner: Option<String> = row.try_get("owner_email").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(LinkRecord {
        code: ShortCode::new(&code).map_err(|e| StorageError::InvalidData(e.to_string()))?,
        original_url,
        owner,
        created_at: parse_timestamp("created_at", created_at)?,
    })
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, original_url, owner_email, created_at
            FROM short_links
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_links
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, record: LinkRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (short_code, original_url, owner_email, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(record.code.as_str())
        .bind(&record.original_url)
        .bind(record.owner.as_deref())
        .bind(record.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_by_destination(
        &self,
        original_url: &str,
        owner: Option<&str>,
    ) -> Result<Option<LinkRecord>> {
        // `<=>` is MySQL's NULL-safe equality, so a NULL owner matches anonymous rows.
        let row = sqlx::query(
            r#"
            SELECT short_code, original_url, owner_email, created_at
            FROM short_links
            WHERE original_url = ?
              AND owner_email <=> ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list(&self, scope: LinkScope<'_>) -> Result<Vec<LinkRecord>> {
        let rows = match scope {
            LinkScope::All => {
                sqlx::query(
                    r#"
                    SELECT short_code, original_url, owner_email, created_at
                    FROM short_links
                    ORDER BY id
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
            LinkScope::Anonymous => {
                sqlx::query(
                    r#"
                    SELECT short_code, original_url, owner_email, created_at
                    FROM short_links
                    WHERE owner_email IS NULL
                    ORDER BY id
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
            LinkScope::Owner(email) => {
                sqlx::query(
                    r#"
                    SELECT short_code, original_url, owner_email, created_at
                    FROM short_links
                    WHERE owner_email = ?
                    ORDER BY id
                    "#,
                )
                .bind(email)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }

    async fn count(&self, scope: LinkScope<'_>) -> Result<u64> {
        let count: i64 = match scope {
            LinkScope::All => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_links")
                    .fetch_one(&self.pool)
                    .await
            }
            LinkScope::Anonymous => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_links WHERE owner_email IS NULL")
                    .fetch_one(&self.pool)
                    .await
            }
            LinkScope::Owner(email) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM short_links WHERE owner_email = ?")
                    .bind(email)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(map_sqlx_error)?;

        u64::try_from(count).map_err(|e| StorageError::InvalidData(e.to_string()))
    }

    async fn delete_owned(&self, code: &ShortCode, owner: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM short_links
            WHERE short_code = ?
              AND owner_email = ?
            "#,
        )
        .bind(code.as_str())
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
