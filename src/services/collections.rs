//! Collection listing service.
//!
//! Fetches the flat collection batch, rebuilds the forest and partitions the
//! roots into the user's groups.

use super::tree::merge_by_identity;
use super::{build_forest, build_forest_with_stats, partition};
use crate::Result;
use crate::client::CollectionSource;
use crate::config::CollectionFetch;
use crate::models::{CollectionGroup, CollectionItem};
use std::time::Instant;

/// Service producing grouped collection trees.
pub struct CollectionService<S> {
    source: S,
    fetch: CollectionFetch,
}

impl<S: CollectionSource> CollectionService<S> {
    /// Creates a service reading from `source` with the given fetch strategy.
    #[must_use]
    pub const fn new(source: S, fetch: CollectionFetch) -> Self {
        Self { source, fetch }
    }

    /// Returns the grouped collection forest.
    ///
    /// # Errors
    ///
    /// Returns an error if collections or groups cannot be fetched.
    pub fn collection_tree(&self) -> Result<Vec<CollectionGroup>> {
        let start = Instant::now();
        let records = self.fetch_records()?;
        let (roots, stats) = build_forest_with_stats(records);

        tracing::debug!(
            records = stats.records,
            roots = stats.roots,
            nested = stats.nested,
            dangling = stats.dangling,
            cycles_broken = stats.cycles_broken,
            strategy = %self.fetch,
            "Rebuilt collection forest"
        );
        if stats.cycles_broken > 0 {
            tracing::warn!(
                cycles = stats.cycles_broken,
                "Parent cycles found in collection data"
            );
        }

        let groups = self.source.groups()?;
        let grouped = partition(roots, groups);

        metrics::histogram!("raindrop_collection_tree_duration_ms")
            .record(start.elapsed().as_secs_f64() * 1000.0);
        Ok(grouped)
    }

    /// Returns top-level collections partitioned into groups, without nesting.
    ///
    /// # Errors
    ///
    /// Returns an error if collections or groups cannot be fetched.
    pub fn root_collections(&self) -> Result<Vec<CollectionGroup>> {
        let roots = build_forest(self.source.root_collections()?);
        let groups = self.source.groups()?;
        Ok(partition(roots, groups))
    }

    /// Returns the merged flat batch: one record per identity, no nesting.
    ///
    /// # Errors
    ///
    /// Returns an error if collections cannot be fetched.
    pub fn flat_collections(&self) -> Result<Vec<CollectionItem>> {
        Ok(merge_by_identity(self.fetch_records()?).into_values().collect())
    }

    fn fetch_records(&self) -> Result<Vec<CollectionItem>> {
        match self.fetch {
            CollectionFetch::RootsAndChildren => {
                let mut records = self.source.root_collections()?;
                records.extend(self.source.child_collections()?);
                Ok(records)
            },
            CollectionFetch::All => self.source.all_collections(),
        }
    }
}
