use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Errors from any persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Static description of a table a record type lives in
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    /// Column holding the owning user's id
    pub owner_column: &'static str,
    /// Every column except `id`, in any order
    pub columns: &'static [&'static str],
}

/// Row-level persistence over JSON rows.
///
/// Rows are JSON objects whose keys match the table's columns. Every row has an
/// `id` (UUID string) and the table's owner column; listed rows are returned
/// newest first by `created_at`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name reported by the health endpoint
    fn backend(&self) -> &'static str;

    async fn insert(&self, table: &TableSpec, row: Value) -> Result<Value, StoreError>;

    async fn fetch(&self, table: &TableSpec, id: Uuid) -> Result<Option<Value>, StoreError>;

    async fn list_owned(&self, table: &TableSpec, owner: Uuid) -> Result<Vec<Value>, StoreError>;

    /// Replace every non-id column of an existing row; `None` when the id is unknown
    async fn update(&self, table: &TableSpec, id: Uuid, row: Value) -> Result<Option<Value>, StoreError>;

    async fn upsert(&self, table: &TableSpec, row: Value) -> Result<Value, StoreError>;

    /// Returns whether a row was removed
    async fn delete(&self, table: &TableSpec, id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
