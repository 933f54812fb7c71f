//! HTTP Transport layer for the Model Context Protocol
//!
//! Provides the external API routing: the JSON-RPC listener at `/`, CORS
//! handling, and the health and discovery endpoints.

pub mod cors;
pub mod handlers;
