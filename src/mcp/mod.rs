//! MCP server implementation.
//!
//! Exposes Raindrop.io to AI agents over the Model Context Protocol.
//!
//! ## Usage
//!
//! ```bash
//! RAINDROP_ACCESS_TOKEN=... raindrop-mcp serve
//! ```
//!
//! ### Claude Desktop Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "raindrop": {
//!       "command": "raindrop-mcp",
//!       "args": ["serve"],
//!       "env": { "RAINDROP_ACCESS_TOKEN": "..." }
//!     }
//!   }
//! }
//! ```

mod dispatch;
mod server;
mod tools;

pub use dispatch::McpMethod;
pub use server::{McpServer, PROTOCOL_VERSION};
pub use tools::{ToolContent, ToolContext, ToolDefinition, ToolRegistry, ToolResult};
