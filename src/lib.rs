//! # Raindrop MCP
//!
//! Model Context Protocol server and typed client for the Raindrop.io
//! bookmarking API.
//!
//! The REST API returns collections as a flat list annotated with parent
//! references, and groups as lists of member collection ids. This crate
//! reassembles that into a nested tree per group and exposes it, together
//! with the rest of the API surface, as MCP tools.
//!
//! ## Features
//!
//! - Deterministic collection tree reconstruction (no loss, no duplication)
//! - Group partitioning with an ungrouped catch-all bucket
//! - Blocking REST client configured from an explicit [`RaindropConfig`]
//! - MCP server over stdio for AI agent interoperability
//!
//! ## Example
//!
//! ```rust
//! use raindrop_mcp::models::{CollectionItem, Group};
//! use raindrop_mcp::services::{build_forest, partition};
//!
//! let records = vec![
//!     CollectionItem::new(10, "Reading"),
//!     CollectionItem::new(11, "Papers").with_parent(10),
//!     CollectionItem::new(12, "Orphan").with_parent(99),
//! ];
//!
//! let roots = build_forest(records);
//! assert_eq!(roots.len(), 2);
//! assert_eq!(roots[0].children.len(), 1);
//!
//! let groups = partition(roots, vec![Group::new("Main", vec![10])]);
//! assert_eq!(groups[0].items.len(), 2);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod client;
pub mod config;
pub mod mcp;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use client::{CollectionSource, RaindropClient};
pub use config::{CollectionFetch, RaindropConfig};
pub use models::{CollectionGroup, CollectionItem, Group, RaindropItem};
pub use services::{CollectionService, build_forest, partition};

/// Error type for raindrop-mcp operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing or malformed tool arguments, missing access token |
/// | `OperationFailed` | Transport failures, undecodable payloads, config file errors |
/// | `Unauthorized` | The API rejected the bearer token (HTTP 401/403) |
/// | `Api` | Any other non-success status, or an envelope with `result: false` |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - JSON deserialization of tool arguments fails
    /// - A required string or id list is empty
    /// - No access token is configured when building the client
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The HTTP request could not be sent or timed out
    /// - A response body could not be decoded
    /// - The configuration file cannot be read or parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The remote API rejected the credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The remote API answered with an error.
    #[error("raindrop api '{operation}' returned {status}: {message}")]
    Api {
        /// The operation that was attempted.
        operation: String,
        /// HTTP status code (200 when the envelope carried `result: false`).
        status: u16,
        /// Error message reported by the API, or the raw body.
        message: String,
    },
}

/// Result type alias for raindrop-mcp operations.
pub type Result<T> = std::result::Result<T, Error>;
