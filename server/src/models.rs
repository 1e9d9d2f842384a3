//! Stored document shapes and their wire conversions.
//!
//! DESIGN
//! ======
//! Field names follow the existing collections (`Title`, `TopicId`,
//! `CreatedAt`, ...) so the service reads data written by earlier
//! deployments. `_id` is required: the service assigns it before insert, and
//! a stored document without one fails to decode instead of reaching the wire
//! with a blank id. `CreatedAt` is a full BSON datetime in storage and whole Unix seconds on
//! the wire.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const TOPICS_COLLECTION: &str = "Topics";
pub const MESSAGES_COLLECTION: &str = "Messages";

// =============================================================================
// DOCUMENTS
// =============================================================================

/// A document in the `Topics` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub created_at: bson::DateTime,
}

/// A document in the `Messages` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub content: String,
    pub created_at: bson::DateTime,
}

// =============================================================================
// WIRE CONVERSION
// =============================================================================

/// Whole Unix seconds for a stored instant, rounded toward negative infinity.
#[must_use]
pub fn unix_seconds(at: bson::DateTime) -> i64 {
    at.to_time_0_3().unix_timestamp()
}

impl From<TopicDoc> for forum_contracts::Topic {
    fn from(doc: TopicDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            created_at: unix_seconds(doc.created_at),
        }
    }
}

impl From<MessageDoc> for forum_contracts::Message {
    fn from(doc: MessageDoc) -> Self {
        Self {
            id: doc.id.to_hex(),
            topic_id: doc.topic_id.to_hex(),
            content: doc.content,
            created_at: unix_seconds(doc.created_at),
        }
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
