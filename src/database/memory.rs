use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Store, StoreError, TableSpec};

/// Process-local store used when no database is configured and in tests.
/// Rows are kept per table in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_matches(row: &Value, id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
}

fn created_at(row: &Value) -> Option<DateTime<Utc>> {
    row.get("created_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, table: &TableSpec, row: Value) -> Result<Value, StoreError> {
        let id = row.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.name).or_default();
        if rows.iter().any(|r| id_matches(r, &id)) {
            return Err(StoreError::Conflict(format!("{} row {} already exists", table.name, id)));
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn fetch(&self, table: &TableSpec, id: Uuid) -> Result<Option<Value>, StoreError> {
        let id = id.to_string();
        let tables = self.tables.read().await;
        Ok(tables
            .get(table.name)
            .and_then(|rows| rows.iter().find(|r| id_matches(r, &id)))
            .cloned())
    }

    async fn list_owned(&self, table: &TableSpec, owner: Uuid) -> Result<Vec<Value>, StoreError> {
        let owner = owner.to_string();
        let tables = self.tables.read().await;
        let mut rows: Vec<Value> = tables
            .get(table.name)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.get(table.owner_column).and_then(Value::as_str) == Some(owner.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Newest inserted first, then a stable sort so equal timestamps keep that order
        rows.reverse();
        rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
        Ok(rows)
    }

    async fn update(&self, table: &TableSpec, id: Uuid, mut row: Value) -> Result<Option<Value>, StoreError> {
        let id = id.to_string();
        let mut tables = self.tables.write().await;
        let Some(slot) = tables
            .get_mut(table.name)
            .and_then(|rows| rows.iter_mut().find(|r| id_matches(r, &id)))
        else {
            return Ok(None);
        };
        row["id"] = Value::String(id);
        *slot = row.clone();
        Ok(Some(row))
    }

    async fn upsert(&self, table: &TableSpec, row: Value) -> Result<Value, StoreError> {
        let id = row.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.name).or_default();
        match rows.iter_mut().find(|r| id_matches(r, &id)) {
            Some(slot) => *slot = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(row)
    }

    async fn delete(&self, table: &TableSpec, id: Uuid) -> Result<bool, StoreError> {
        let id = id.to_string();
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table.name) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|r| !id_matches(r, &id));
        Ok(rows.len() != before)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
