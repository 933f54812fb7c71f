//! Model Context Protocol (MCP) server handling and JSON-RPC implementations
//!
//! Provides the JSON-RPC envelope handling and the method dispatcher.

pub mod rpc;
pub mod server;
