//! Domain services used by the RPC layer.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation, query construction and document mapping
//! so RPC handlers can stay focused on protocol translation and status
//! mapping.

pub mod forum;
