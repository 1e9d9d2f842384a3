//! Forum service: topics and the messages posted under them.
//!
//! DESIGN
//! ======
//! Stateless: the service holds only the two collection handles and a clock,
//! all injected at construction. Every operation validates its input, issues
//! exactly one store call, and maps the resulting documents to wire messages.
//! No retries, caching or cross-call state.
//!
//! Identifier handling is asymmetric: `get_topic` and
//! `send_message` reject a malformed id, while `list_messages` answers an
//! empty list for the same input. Topic existence is never checked when
//! posting a message, so dangling `TopicId` references are possible.
//!
//! ERROR HANDLING
//! ==============
//! Operations return [`ForumError`]; the RPC layer maps it to a status code
//! and does the logging. Store errors carry the driver's text unchanged.

use std::sync::Arc;

use bson::oid::ObjectId;
use bson::{Document, doc};
use forum_contracts::{Message, Topic};
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::models::{MessageDoc, TopicDoc};
use crate::store::{DocumentCollection, StoreError, parse_object_id};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error("Invalid Id")]
    InvalidId,
    #[error("Invalid TopicId")]
    InvalidTopicId,
    #[error("Topic not found")]
    TopicNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ForumError {
    /// Grepable code used in log lines.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidId => "E_INVALID_ID",
            Self::InvalidTopicId => "E_INVALID_TOPIC_ID",
            Self::TopicNotFound => "E_TOPIC_NOT_FOUND",
            Self::Store(_) => "E_STORE",
        }
    }

    /// Whether the caller may succeed by retrying the same request later.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

pub type TopicCollection = Arc<dyn DocumentCollection<TopicDoc>>;
pub type MessageCollection = Arc<dyn DocumentCollection<MessageDoc>>;

/// Request handler for the forum RPCs.
#[derive(Clone)]
pub struct ForumService {
    topics: TopicCollection,
    messages: MessageCollection,
    clock: Arc<dyn Clock>,
}

impl ForumService {
    #[must_use]
    pub fn new(topics: TopicCollection, messages: MessageCollection) -> Self {
        Self::with_clock(topics, messages, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(topics: TopicCollection, messages: MessageCollection, clock: Arc<dyn Clock>) -> Self {
        Self { topics, messages, clock }
    }

    fn now(&self) -> bson::DateTime {
        bson::DateTime::from_time_0_3(self.clock.now())
    }

    // =========================================================================
    // TOPICS
    // =========================================================================

    /// List topics newest first, optionally filtered by a title substring.
    ///
    /// # Errors
    ///
    /// Returns [`ForumError::Store`] if the query fails.
    pub async fn list_topics(&self, search_query: &str) -> Result<Vec<Topic>, ForumError> {
        let docs = self
            .topics
            .find_all(title_filter(search_query), Some(doc! { "CreatedAt": -1 }))
            .await?;
        Ok(docs.into_iter().map(Topic::from).collect())
    }

    /// Fetch a single topic by id.
    ///
    /// # Errors
    ///
    /// [`ForumError::InvalidId`] for a malformed id, [`ForumError::TopicNotFound`]
    /// when nothing matches, [`ForumError::Store`] if the query fails.
    pub async fn get_topic(&self, id: &str) -> Result<Topic, ForumError> {
        let id = parse_object_id(id).ok_or(ForumError::InvalidId)?;
        let doc = self
            .topics
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(ForumError::TopicNotFound)?;
        Ok(doc.into())
    }

    /// Persist a new topic stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`ForumError::Store`] if the insert fails.
    pub async fn create_topic(&self, title: &str, description: &str) -> Result<Topic, ForumError> {
        let mut doc = TopicDoc {
            id: ObjectId::new(),
            title: title.to_owned(),
            description: description.to_owned(),
            created_at: self.now(),
        };
        let id = self.topics.insert_one(&doc).await?;
        doc.id = id;
        info!(topic_id = %id, "topic created");
        Ok(doc.into())
    }

    // =========================================================================
    // MESSAGES
    // =========================================================================

    /// List a topic's messages oldest first. A malformed topic id yields an
    /// empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ForumError::Store`] if the query fails.
    pub async fn list_messages(&self, topic_id: &str) -> Result<Vec<Message>, ForumError> {
        let Some(topic_id) = parse_object_id(topic_id) else {
            return Ok(Vec::new());
        };
        let docs = self
            .messages
            .find_all(doc! { "TopicId": topic_id }, Some(doc! { "CreatedAt": 1 }))
            .await?;
        Ok(docs.into_iter().map(Message::from).collect())
    }

    /// Post a message under `topic_id`. The topic is not required to exist.
    ///
    /// # Errors
    ///
    /// [`ForumError::InvalidTopicId`] for a malformed id, [`ForumError::Store`]
    /// if the insert fails.
    pub async fn send_message(&self, topic_id: &str, content: &str) -> Result<Message, ForumError> {
        let topic_id = parse_object_id(topic_id).ok_or(ForumError::InvalidTopicId)?;
        let mut doc = MessageDoc {
            id: ObjectId::new(),
            topic_id,
            content: content.to_owned(),
            created_at: self.now(),
        };
        let id = self.messages.insert_one(&doc).await?;
        doc.id = id;
        info!(message_id = %id, %topic_id, "message sent");
        Ok(doc.into())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Build the title filter for a search. Blank queries match everything; any
/// other text matches as a literal, case-insensitive substring.
#[must_use]
pub fn title_filter(search_query: &str) -> Document {
    if search_query.trim().is_empty() {
        return Document::new();
    }
    doc! { "Title": { "$regex": regex::escape(search_query), "$options": "i" } }
}

#[cfg(test)]
#[path = "forum_test.rs"]
mod tests;
