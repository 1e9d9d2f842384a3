//! Document-store seam between the forum service and MongoDB.
//!
//! SYSTEM CONTEXT
//! ==============
//! The forum service speaks in BSON filter and sort documents and never
//! touches the driver directly. [`DocumentCollection`] is the whole surface
//! it needs: "find all matching, optionally sorted", "find one by exact
//! match" and "insert one, get the assigned id". Production wires
//! `mongodb::Collection<T>`; tests wire the in-memory collection from
//! [`test_helpers`].

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use futures::TryStreamExt;
use serde::Serialize;
use serde::de::DeserializeOwned;

// =============================================================================
// ERROR
// =============================================================================

/// Failures raised by a document collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
    #[error("document serialization failed: {0}")]
    Serialize(#[from] bson::ser::Error),
    #[error("document deserialization failed: {0}")]
    Deserialize(#[from] bson::de::Error),
    #[error("store assigned a non-ObjectId identifier: {0}")]
    UnexpectedId(Bson),
}

// =============================================================================
// COLLECTION TRAIT
// =============================================================================

/// Per-collection operations consumed by the forum service.
#[async_trait]
pub trait DocumentCollection<T>: Send + Sync {
    /// Materialize every document matching `filter`, ordered by `sort` when given.
    async fn find_all(&self, filter: Document, sort: Option<Document>) -> Result<Vec<T>, StoreError>;

    /// Return the first document matching `filter`, if any.
    async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError>;

    /// Insert `record` and return the identifier the store assigned to it.
    async fn insert_one(&self, record: &T) -> Result<ObjectId, StoreError>;
}

/// Parse `raw` as a store identifier. `None` when it is not 24 hex digits.
#[must_use]
pub fn parse_object_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

// =============================================================================
// MONGODB
// =============================================================================

#[async_trait]
impl<T> DocumentCollection<T> for mongodb::Collection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    async fn find_all(&self, filter: Document, sort: Option<Document>) -> Result<Vec<T>, StoreError> {
        let mut find = self.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError> {
        Ok(mongodb::Collection::find_one(self, filter).await?)
    }

    async fn insert_one(&self, record: &T) -> Result<ObjectId, StoreError> {
        let result = mongodb::Collection::insert_one(self, record).await?;
        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id),
            other => Err(StoreError::UnexpectedId(other)),
        }
    }
}

#[cfg(test)]
pub mod test_helpers;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
