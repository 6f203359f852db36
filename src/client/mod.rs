//! Raindrop.io REST client.
//!
//! [`CollectionSource`] is the seam between the collection service and the
//! network: the service only needs flat collection batches and groups, so
//! tests can substitute an in-memory source. [`RaindropClient`] implements it
//! against the live API and also exposes the full bookmark and tag surface
//! used by the MCP tools.

mod http;

pub use http::RaindropClient;

use crate::Result;
use crate::models::{CollectionItem, Group};

/// Supplier of flat collection records and groups.
pub trait CollectionSource: Send + Sync {
    /// Fetches top-level collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn root_collections(&self) -> Result<Vec<CollectionItem>>;

    /// Fetches nested collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn child_collections(&self) -> Result<Vec<CollectionItem>>;

    /// Fetches every collection in one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn all_collections(&self) -> Result<Vec<CollectionItem>>;

    /// Fetches the user's groups in sidebar order.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn groups(&self) -> Result<Vec<Group>>;
}

impl<S: CollectionSource + ?Sized> CollectionSource for std::sync::Arc<S> {
    fn root_collections(&self) -> Result<Vec<CollectionItem>> {
        (**self).root_collections()
    }

    fn child_collections(&self) -> Result<Vec<CollectionItem>> {
        (**self).child_collections()
    }

    fn all_collections(&self) -> Result<Vec<CollectionItem>> {
        (**self).all_collections()
    }

    fn groups(&self) -> Result<Vec<Group>> {
        (**self).groups()
    }
}
