//! Wire contract for the anonymous forum RPC service.
//!
//! This crate owns the protobuf messages and the `forum.Forum` service
//! plumbing shared by the server and any Rust client. Everything under
//! [`proto`] is generated from `proto/forum.proto` at build time; the
//! re-exports below are the names the rest of the workspace uses.

pub mod proto {
    //! Generated protobuf types and service definitions.
    #![allow(clippy::pedantic)]
    tonic::include_proto!("forum");
}

pub use proto::forum_client::ForumClient;
pub use proto::forum_server::{Forum, ForumServer, SERVICE_NAME};
pub use proto::{
    CreateTopicRequest, GetMessagesRequest, GetMessagesResponse, GetTopicRequest, GetTopicsRequest,
    GetTopicsResponse, Message, SendMessageRequest, Topic,
};

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
