//! Capability registry and the handlers behind each MCP method
//!
//! Provides the talent-assistant tools, resources and prompts exposed over the MCP protocol

pub mod arguments;
pub mod prompts;
pub mod registry;
pub mod resources;
pub mod tools;
