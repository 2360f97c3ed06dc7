//! Demo console for a knowledge-base backend.
//!
//! Serves a single-page UI for uploading documents and chatting with a
//! retrieval service. Uploaded files go through the ingestion dispatcher
//! in [`extract`], which turns them into plain text for the backend.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod extract;
pub mod session;
pub mod websocket;
