//! MongoDB client construction and collection handles.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to build the shared driver client and open the
//! `Topics` and `Messages` collections before accepting RPC traffic. The
//! driver connects lazily and owns pooling and retries, so an unreachable
//! server surfaces on the first query rather than here.

use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::config::ServerConfig;
use crate::models::{MESSAGES_COLLECTION, MessageDoc, TOPICS_COLLECTION, TopicDoc};

const APP_NAME: &str = "forum-server";

/// Build a driver client from the configured URI and pool size.
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed.
pub async fn connect(config: &ServerConfig) -> Result<Client, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
    options.app_name = Some(APP_NAME.to_string());
    if let Some(max) = config.max_pool_size {
        options.max_pool_size = Some(max);
    }
    Client::with_options(options)
}

/// Open (without creating) the two forum collections in `database`.
#[must_use]
pub fn open_collections(client: &Client, database: &str) -> (Collection<TopicDoc>, Collection<MessageDoc>) {
    let db = client.database(database);
    (db.collection(TOPICS_COLLECTION), db.collection(MESSAGES_COLLECTION))
}
