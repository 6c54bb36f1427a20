//! Entry store: find-all, insert, delete-by-id

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entities::entry;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid entry id: {0:?}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Fields a caller may supply for a new entry. The id is always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub word: String,
    pub translation: String,
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// All entries, oldest first
    async fn find_all(&self) -> Result<Vec<entry::Model>, StoreError>;

    /// Persist `entry` under a freshly generated id and return the stored row
    async fn insert(&self, entry: NewEntry) -> Result<entry::Model, StoreError>;

    /// Remove the entry with the given textual id
    ///
    /// # Errors
    /// [`StoreError::InvalidId`] if `id` is not a UUID, [`StoreError::NotFound`]
    /// if nothing was deleted.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

/// [`EntryStore`] backed by a SeaORM connection pool
#[derive(Clone)]
pub struct SeaOrmEntryStore {
    db: DatabaseConnection,
}

impl SeaOrmEntryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryStore for SeaOrmEntryStore {
    async fn find_all(&self) -> Result<Vec<entry::Model>, StoreError> {
        let entries = entry::Entity::find()
            .order_by_asc(entry::Column::CreatedAt)
            .order_by_asc(entry::Column::Id)
            .all(&self.db)
            .await?;

        debug!("Loaded {} entries", entries.len());
        Ok(entries)
    }

    async fn insert(&self, new_entry: NewEntry) -> Result<entry::Model, StoreError> {
        let model = entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            word: Set(new_entry.word),
            translation: Set(new_entry.translation),
            created_at: Set(Utc::now()),
        };

        let inserted = model.insert(&self.db).await?;
        debug!("Inserted entry {}", inserted.id);

        Ok(inserted)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let id = Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;

        let result = entry::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        debug!("Deleted entry {}", id);
        Ok(())
    }
}
