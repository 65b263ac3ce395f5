use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::error::Result;
use snip_core::{InsertOutcome, Mapping, MappingStore, SeedSource, ShortCode, StoreError};
use sqlx::{MySqlPool, Row};
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/mysql/schema.sql");

/// Sequence row used by the service for short code seeds.
pub const DEFAULT_SEQUENCE: &str = "short_urls";

/// MySQL implementation of the mapping store.
///
/// Atomicity of [`MappingStore::insert_if_absent`] comes from the primary key
/// on `short_code`: a concurrent duplicate fails with a unique violation,
/// which is reported as [`InsertOutcome::Occupied`].
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("mysql schema is up to date");
        Ok(())
    }

    /// Returns the persisted seed sequence `name`, creating its row at zero
    /// if needed. The sequence shares this store's pool.
    pub async fn sequence(&self, name: &str) -> Result<MySqlSequence> {
        sqlx::query("INSERT IGNORE INTO snip_sequences (name, next_value) VALUES (?, 0)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(MySqlSequence {
            pool: self.pool.clone(),
            name: name.to_owned(),
        })
    }
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StoreError::InvalidData(format!("invalid created_at timestamp '{}': {e}", millis))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl MappingStore for MySqlStore {
    async fn insert_if_absent(&self, mapping: &Mapping) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, original_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(mapping.code.as_str())
        .bind(mapping.url.as_str())
        .bind(mapping.created_at.as_millisecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Occupied),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        let row = sqlx::query(
            r#"
            SELECT original_url, created_at
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

        Ok(Some(Mapping {
            code: code.clone(),
            url,
            created_at: parse_created_at(created_at)?,
        }))
    }
}

/// A counter seed persisted in the `snip_sequences` table.
///
/// Advancing uses MySQL's `LAST_INSERT_ID(expr)` idiom: the `UPDATE` bumps
/// the row under its row lock and records the new value as the connection's
/// last insert id, which the following `SELECT` on the same connection reads
/// back. Concurrent callers, in this process or others, each get their own
/// value.
#[derive(Debug, Clone)]
pub struct MySqlSequence {
    pool: MySqlPool,
    name: String,
}

#[async_trait]
impl SeedSource for MySqlSequence {
    async fn next_seed(&self) -> Result<u64> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let updated = sqlx::query(
            "UPDATE snip_sequences SET next_value = LAST_INSERT_ID(next_value + 1) WHERE name = ?",
        )
        .bind(&self.name)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::InvalidData(format!(
                "sequence '{}' does not exist",
                self.name
            )));
        }

        let advanced: u64 = sqlx::query_scalar("SELECT LAST_INSERT_ID()")
            .fetch_one(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        // the row now holds the value after ours
        Ok(advanced - 1)
    }
}
