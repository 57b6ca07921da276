//! Document store abstraction.
//!
//! Handlers only ever see `Arc<dyn DocumentStore>`. A deployment without a
//! configured database gets [`UnavailableStore`], which fails writes and
//! returns nothing for reads, instead of a missing handle.

use async_trait::async_trait;
use mongodb::bson::{self, Bson, DateTime as BsonDateTime, Document};
use serde::Serialize;
use service_core::error::AppError;
use service_core::utils::truncate_chars;
use thiserror::Error;

/// Collection names reported by [`DocumentStore::describe`].
pub const MAX_LISTED_COLLECTIONS: usize = 10;

/// Error text kept in a diagnostics status string.
pub const STATUS_ERROR_CHARS: usize = 50;

pub const DATABASE_NOT_INITIALIZED: &str = "⚠️  Available but not initialized";
pub const DATABASE_AVAILABLE: &str = "✅ Available";
pub const DATABASE_WORKING: &str = "✅ Connected & Working";
pub const CONNECTED: &str = "Connected";
pub const NOT_CONNECTED: &str = "Not Connected";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available")]
    Unavailable,

    #[error("{0}")]
    Operation(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Operation(err.to_string())
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

/// Connectivity summary produced by [`DocumentStore::describe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub database: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl StoreStatus {
    pub fn not_initialized() -> Self {
        Self {
            database: DATABASE_NOT_INITIALIZED.to_string(),
            connection_status: NOT_CONNECTED.to_string(),
            collections: Vec::new(),
        }
    }

    fn available() -> Self {
        Self {
            database: DATABASE_AVAILABLE.to_string(),
            connection_status: CONNECTED.to_string(),
            collections: Vec::new(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Whether a store handle exists. Says nothing about reachability.
    fn is_available(&self) -> bool;

    /// Writes `document` and returns the identifier assigned to it.
    async fn insert_document(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<String, StoreError>;

    /// Returns at most `limit` documents whose fields equal every entry of
    /// `filter`. A store without a handle returns an empty list.
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError>;

    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Best-effort probe for diagnostics; failures end up in the status text.
    async fn describe(&self) -> StoreStatus {
        if !self.is_available() {
            return StoreStatus::not_initialized();
        }

        let mut status = StoreStatus::available();
        match self.collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_LISTED_COLLECTIONS);
                status.collections = names;
                status.database = DATABASE_WORKING.to_string();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Listing collections failed");
                status.database = format!(
                    "⚠️  Connected but Error: {}",
                    truncate_chars(&e.to_string(), STATUS_ERROR_CHARS)
                );
            }
        }
        status
    }
}

impl<'a> dyn DocumentStore + 'a {
    /// Serializes a validated resource, stamps `created_at`/`updated_at`
    /// and writes it to `collection`.
    pub async fn insert<R>(&self, collection: &str, resource: &R) -> Result<String, StoreError>
    where
        R: Serialize + Sync,
    {
        let mut document = bson::to_document(resource)?;
        let now = BsonDateTime::now();
        document.insert("created_at", now);
        document.insert("updated_at", now);

        self.insert_document(collection, document).await
    }
}

/// Renders a store-assigned `_id` the way clients receive it.
pub fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

/// Stand-in used when no database is configured or the client could not be
/// created.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

#[async_trait]
impl DocumentStore for UnavailableStore {
    fn is_available(&self) -> bool {
        false
    }

    async fn insert_document(
        &self,
        _collection: &str,
        _document: Document,
    ) -> Result<String, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn find(
        &self,
        _collection: &str,
        _filter: Document,
        _limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(Vec::new())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}
