use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::store::{Store, StoreError, TableSpec};

/// A row type stored in one table and owned by one user
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: TableSpec;

    fn id(&self) -> Uuid;

    fn owner_id(&self) -> Uuid;
}

/// Typed access to one table over any store backend
pub struct Repository<T> {
    store: Arc<dyn Store>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            _phantom: std::marker::PhantomData,
        }
    }

    fn encode(record: &T) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(record)?)
    }

    fn decode(row: Value) -> Result<T, StoreError> {
        Ok(serde_json::from_value(row)?)
    }

    pub async fn create(&self, record: &T) -> Result<T, StoreError> {
        let row = self.store.insert(&T::TABLE, Self::encode(record)?).await?;
        Self::decode(row)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.store.fetch(&T::TABLE, id).await?.map(Self::decode).transpose()
    }

    /// Rows owned by `owner`, newest first
    pub async fn list_for(&self, owner: Uuid) -> Result<Vec<T>, StoreError> {
        self.store
            .list_owned(&T::TABLE, owner)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Persist every column of an existing record
    pub async fn save(&self, record: &T) -> Result<T, StoreError> {
        let id = record.id();
        match self.store.update(&T::TABLE, id, Self::encode(record)?).await? {
            Some(row) => Self::decode(row),
            None => Err(StoreError::NotFound(format!("{} row {} not found", T::TABLE.name, id))),
        }
    }

    pub async fn upsert(&self, record: &T) -> Result<T, StoreError> {
        let row = self.store.upsert(&T::TABLE, Self::encode(record)?).await?;
        Self::decode(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.store.delete(&T::TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        user_id: Uuid,
        body: String,
        created_at: String,
    }

    impl Record for Note {
        const TABLE: TableSpec = TableSpec {
            name: "notes",
            owner_column: "user_id",
            columns: &["user_id", "body", "created_at"],
        };

        fn id(&self) -> Uuid {
            self.id
        }

        fn owner_id(&self) -> Uuid {
            self.user_id
        }
    }

    fn note(owner: Uuid) -> Note {
        Note {
            id: Uuid::new_v4(),
            user_id: owner,
            body: "first".into(),
            created_at: "2024-05-01T12:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn create_find_and_save() {
        let repo = Repository::<Note>::new(Arc::new(MemoryStore::new()));
        let mut n = repo.create(&note(Uuid::new_v4())).await.unwrap();
        assert_eq!(repo.find(n.id).await.unwrap(), Some(n.clone()));

        n.body = "second".into();
        repo.save(&n).await.unwrap();
        assert_eq!(repo.find(n.id).await.unwrap().unwrap().body, "second");
    }

    #[tokio::test]
    async fn save_of_unknown_row_is_not_found() {
        let repo = Repository::<Note>::new(Arc::new(MemoryStore::new()));
        let err = repo.save(&note(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(repo.find(Uuid::new_v4()).await.unwrap().is_none());
    }
}
