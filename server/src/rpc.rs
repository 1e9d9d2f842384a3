//! gRPC adapter: `forum.Forum` requests in, [`ForumService`] calls out.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the single error-mapping layer. Handlers unwrap the protobuf
//! request, call the service, and turn any [`ForumError`] into a
//! `tonic::Status` after logging it with the RPC name:
//!
//! | error              | status            | message                 |
//! |--------------------|-------------------|-------------------------|
//! | `InvalidId`        | `InvalidArgument` | `Invalid Id`            |
//! | `InvalidTopicId`   | `InvalidArgument` | `Invalid TopicId`       |
//! | `TopicNotFound`    | `NotFound`        | `Topic not found`       |
//! | `Store(_)`         | `Internal`        | store error text        |
//!
//! With redaction enabled, `Internal` carries [`REDACTED_MESSAGE`] instead of
//! the store error text; the full error still goes to the log.

use async_trait::async_trait;
use forum_contracts::{
    CreateTopicRequest, Forum, GetMessagesRequest, GetMessagesResponse, GetTopicRequest, GetTopicsRequest,
    GetTopicsResponse, Message, SendMessageRequest, Topic,
};
use tonic::{Request, Response, Status};
use tracing::{debug, error, warn};

use crate::services::forum::{ForumError, ForumService};

/// `Internal` status text used when store errors are redacted.
pub const REDACTED_MESSAGE: &str = "internal error";

pub struct ForumRpc {
    service: ForumService,
    redact_internal_errors: bool,
}

impl ForumRpc {
    #[must_use]
    pub fn new(service: ForumService, redact_internal_errors: bool) -> Self {
        Self { service, redact_internal_errors }
    }

    fn fail(&self, rpc: &'static str, err: ForumError) -> Status {
        if let ForumError::Store(_) = err {
            error!(rpc, code = err.error_code(), retryable = err.retryable(), error = %err, detail = ?err, "forum call failed");
        } else {
            warn!(rpc, code = err.error_code(), error = %err, "forum call rejected");
        }
        to_status(&err, self.redact_internal_errors)
    }
}

/// Map a service error to the status returned to the caller.
#[must_use]
pub fn to_status(err: &ForumError, redact_internal_errors: bool) -> Status {
    match err {
        ForumError::InvalidId | ForumError::InvalidTopicId => Status::invalid_argument(err.to_string()),
        ForumError::TopicNotFound => Status::not_found(err.to_string()),
        ForumError::Store(_) if redact_internal_errors => Status::internal(REDACTED_MESSAGE),
        ForumError::Store(_) => Status::internal(err.to_string()),
    }
}

#[async_trait]
impl Forum for ForumRpc {
    async fn get_topics(&self, request: Request<GetTopicsRequest>) -> Result<Response<GetTopicsResponse>, Status> {
        let request = request.into_inner();
        let topics = self
            .service
            .list_topics(&request.search_query)
            .await
            .map_err(|e| self.fail("GetTopics", e))?;
        debug!(count = topics.len(), "topics listed");
        Ok(Response::new(GetTopicsResponse { topics }))
    }

    async fn get_topic(&self, request: Request<GetTopicRequest>) -> Result<Response<Topic>, Status> {
        let request = request.into_inner();
        let topic = self
            .service
            .get_topic(&request.id)
            .await
            .map_err(|e| self.fail("GetTopic", e))?;
        Ok(Response::new(topic))
    }

    async fn create_topic(&self, request: Request<CreateTopicRequest>) -> Result<Response<Topic>, Status> {
        let request = request.into_inner();
        let topic = self
            .service
            .create_topic(&request.title, &request.description)
            .await
            .map_err(|e| self.fail("CreateTopic", e))?;
        Ok(Response::new(topic))
    }

    async fn get_messages(
        &self,
        request: Request<GetMessagesRequest>,
    ) -> Result<Response<GetMessagesResponse>, Status> {
        let request = request.into_inner();
        let messages = self
            .service
            .list_messages(&request.topic_id)
            .await
            .map_err(|e| self.fail("GetMessages", e))?;
        debug!(topic_id = %request.topic_id, count = messages.len(), "messages listed");
        Ok(Response::new(GetMessagesResponse { messages }))
    }

    async fn send_message(&self, request: Request<SendMessageRequest>) -> Result<Response<Message>, Status> {
        let request = request.into_inner();
        let message = self
            .service
            .send_message(&request.topic_id, &request.content)
            .await
            .map_err(|e| self.fail("SendMessage", e))?;
        Ok(Response::new(message))
    }
}

#[cfg(test)]
#[path = "rpc_test.rs"]
mod tests;
