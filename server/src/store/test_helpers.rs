//! In-memory collections for service tests.
//!
//! `MemoryCollection` evaluates the same filter documents the forum service
//! sends to MongoDB (field equality and `$regex` with `$options`), so tests
//! exercise the real query construction rather than a parallel code path.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use regex::RegexBuilder;
use serde::Serialize;
use serde::de::{DeserializeOwned, Error as _};

use super::{DocumentCollection, StoreError};

// =============================================================================
// MEMORY COLLECTION
// =============================================================================

pub struct MemoryCollection<T> {
    docs: Mutex<Vec<Document>>,
    calls: AtomicUsize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MemoryCollection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { docs: Mutex::new(Vec::new()), calls: AtomicUsize::new(0), _marker: PhantomData }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    /// Number of store operations issued against this collection.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Store a raw document as-is, bypassing serialization.
    pub fn insert_raw(&self, doc: Document) {
        self.docs.lock().unwrap().push(doc);
    }

    fn matching(&self, filter: &Document) -> Vec<Document> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        let docs = self.docs.lock().unwrap();
        docs.iter().filter(|doc| matches_filter(doc, filter)).cloned().collect()
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> DocumentCollection<T> for MemoryCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    async fn find_all(&self, filter: Document, sort: Option<Document>) -> Result<Vec<T>, StoreError> {
        let mut matched = self.matching(&filter);
        if let Some(sort) = sort {
            // Stable sort: ties keep insertion order, like a natural-order scan.
            matched.sort_by(|a, b| compare_by(a, b, &sort));
        }
        matched
            .into_iter()
            .map(|doc| bson::from_document(doc).map_err(StoreError::from))
            .collect()
    }

    async fn find_one(&self, filter: Document) -> Result<Option<T>, StoreError> {
        self.matching(&filter)
            .into_iter()
            .next()
            .map(|doc| bson::from_document(doc).map_err(StoreError::from))
            .transpose()
    }

    async fn insert_one(&self, record: &T) -> Result<ObjectId, StoreError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut doc = bson::to_document(record)?;
        let id = match doc.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            _ => {
                let id = ObjectId::new();
                doc.insert("_id", id);
                id
            }
        };
        self.docs.lock().unwrap().push(doc);
        Ok(id)
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, condition)| match condition {
        Bson::Document(ops) if ops.contains_key("$regex") => {
            let pattern = ops.get_str("$regex").expect("$regex must be a string");
            let insensitive = ops.get_str("$options").map_or(false, |o| o.contains('i'));
            let re = RegexBuilder::new(pattern)
                .case_insensitive(insensitive)
                .build()
                .expect("filter regex should compile");
            doc.get_str(key).map_or(false, |value| re.is_match(value))
        }
        expected => doc.get(key) == Some(expected),
    })
}

fn compare_by(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (key, direction) in sort {
        let ordering = match (a.get(key), b.get(key)) {
            (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
            (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
            _ => Ordering::Equal,
        };
        let ordering = if direction.as_i32() == Some(-1) { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

// =============================================================================
// FAILING COLLECTION
// =============================================================================

/// Collection whose every operation fails with the given message.
pub struct FailingCollection {
    message: String,
}

impl FailingCollection {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self { message: message.to_owned() }
    }

    fn error(&self) -> StoreError {
        StoreError::Deserialize(bson::de::Error::custom(&self.message))
    }
}

#[async_trait]
impl<T: Send + Sync> DocumentCollection<T> for FailingCollection {
    async fn find_all(&self, _filter: Document, _sort: Option<Document>) -> Result<Vec<T>, StoreError> {
        Err(self.error())
    }

    async fn find_one(&self, _filter: Document) -> Result<Option<T>, StoreError> {
        Err(self.error())
    }

    async fn insert_one(&self, _record: &T) -> Result<ObjectId, StoreError> {
        Err(self.error())
    }
}
