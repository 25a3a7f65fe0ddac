use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::store::{Store, StoreError, TableSpec};
use crate::config::DatabaseConfig;

/// Postgres-backed store (works against a hosted Supabase database).
///
/// Rows cross the boundary as JSON: writes go through `jsonb_populate_record`
/// so the table definition drives column types, reads come back through
/// `row_to_json`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected database pool (max {} connections)", config.max_connections);

        if config.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database migrations applied");
        }

        Ok(Self { pool })
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn assignments(table: &TableSpec, source: &str) -> String {
        table
            .columns
            .iter()
            .map(|c| {
                let col = Self::quote_identifier(c);
                format!("{col} = {source}.{col}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn decode_row(row: &sqlx::postgres::PgRow) -> Result<Value, StoreError> {
        Ok(row.try_get::<Value, _>("row")?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, table: &TableSpec, row: Value) -> Result<Value, StoreError> {
        let name = Self::quote_identifier(table.name);
        let sql = format!(
            "INSERT INTO {name} SELECT * FROM jsonb_populate_record(NULL::{name}, $1) \
             RETURNING row_to_json({name}.*) AS row"
        );

        let result = sqlx::query(&sql).bind(row).fetch_one(&self.pool).await;
        match result {
            Ok(r) => Self::decode_row(&r),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict(format!("{} row already exists", table.name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch(&self, table: &TableSpec, id: Uuid) -> Result<Option<Value>, StoreError> {
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM {} t WHERE t.id = $1",
            Self::quote_identifier(table.name)
        );

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::decode_row).transpose()
    }

    async fn list_owned(&self, table: &TableSpec, owner: Uuid) -> Result<Vec<Value>, StoreError> {
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM {} t WHERE t.{} = $1 ORDER BY t.created_at DESC",
            Self::quote_identifier(table.name),
            Self::quote_identifier(table.owner_column),
        );

        let rows = sqlx::query(&sql).bind(owner).fetch_all(&self.pool).await?;
        rows.iter().map(Self::decode_row).collect()
    }

    async fn update(&self, table: &TableSpec, id: Uuid, row: Value) -> Result<Option<Value>, StoreError> {
        let name = Self::quote_identifier(table.name);
        let sql = format!(
            "UPDATE {name} AS target SET {} \
             FROM jsonb_populate_record(NULL::{name}, $1) AS incoming \
             WHERE target.id = $2 \
             RETURNING row_to_json(target.*) AS row",
            Self::assignments(table, "incoming"),
        );

        let row = sqlx::query(&sql).bind(row).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::decode_row).transpose()
    }

    async fn upsert(&self, table: &TableSpec, row: Value) -> Result<Value, StoreError> {
        let name = Self::quote_identifier(table.name);
        let sql = format!(
            "INSERT INTO {name} SELECT * FROM jsonb_populate_record(NULL::{name}, $1) \
             ON CONFLICT (id) DO UPDATE SET {} \
             RETURNING row_to_json({name}.*) AS row",
            Self::assignments(table, "EXCLUDED"),
        );

        let r = sqlx::query(&sql).bind(row).fetch_one(&self.pool).await?;
        Self::decode_row(&r)
    }

    async fn delete(&self, table: &TableSpec, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::quote_identifier(table.name));
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Pings the pool to ensure connectivity
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
