//! Business logic services.
//!
//! The tree builder and the group partitioner are pure functions over owned
//! data; [`CollectionService`] wires them to a [`crate::client::CollectionSource`].

mod collections;
mod partition;
mod tree;

pub use collections::CollectionService;
pub use partition::partition;
pub use tree::{ForestStats, build_forest, build_forest_with_stats};
