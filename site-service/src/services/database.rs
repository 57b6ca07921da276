use crate::services::store::{id_to_string, DocumentStore, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Client as MongoClient, Database,
};

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
}

impl MongoStore {
    /// Builds the client. The driver connects lazily, so an unreachable
    /// server only shows up on the first operation.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            StoreError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn is_available(&self) -> bool {
        true
    }

    async fn insert_document(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<String, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, "Insert failed: {}", e);
                StoreError::from(e)
            })?;

        Ok(id_to_string(result.inserted_id))
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        // The driver reads a limit of 0 as "no limit"
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let options = FindOptions::builder().limit(limit).build();
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter, options)
            .await?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(|e| {
            tracing::error!(collection = %collection, "Reading cursor failed: {}", e);
            StoreError::from(e)
        })?;
        Ok(documents)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.db.list_collection_names(None).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}
