//! Interval index for efficient locus queries
//!
//! Uses rust-lapper for O(log n + k) interval queries, with one Lapper per
//! sequence so that queries never cross sequence boundaries.

use crate::core::locus::Locus;
use rust_lapper::{Interval, Lapper};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Type alias for locus intervals
pub type LocusInterval = Interval<u64, Arc<Locus>>;

/// Interval index organized by sequence id
///
/// Provides O(log n + k) interval queries where n is the number of
/// intervals and k is the number of overlapping results.
#[derive(Default)]
pub struct LocusIndex {
    /// Sequence id -> interval tree (using Lapper)
    trees: BTreeMap<String, Lapper<u64, Arc<Locus>>>,
}

impl LocusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build index from a collection of loci
    ///
    /// Groups intervals per sequence and builds each Lapper once, which is
    /// much cheaper than repeated `insert` calls.
    pub fn from_loci<'a, I>(loci: I) -> Self
    where
        I: IntoIterator<Item = &'a Arc<Locus>>,
    {
        let mut by_sequence: BTreeMap<String, Vec<LocusInterval>> = BTreeMap::new();

        for locus in loci {
            by_sequence
                .entry(locus.sequence_id().to_string())
                .or_default()
                .push(to_interval(locus));
        }

        let trees = by_sequence
            .into_iter()
            .map(|(seq, intervals)| (seq, Lapper::new(intervals)))
            .collect();

        Self { trees }
    }

    /// Get the tree for a sequence, creating an empty one on first use
    pub fn ensure_sequence(&mut self, sequence_id: &str) -> &mut Lapper<u64, Arc<Locus>> {
        self.trees
            .entry(sequence_id.to_string())
            .or_insert_with(|| Lapper::new(Vec::new()))
    }

    /// Add a single locus under its own sequence id
    pub fn insert(&mut self, locus: Arc<Locus>) {
        let interval = to_interval(&locus);
        self.ensure_sequence(locus.sequence_id()).insert(interval);
    }

    /// Query loci overlapping `[start, end)` on a sequence
    ///
    /// With `strict = true` only loci whose interval subsumes the queried
    /// interval are returned. Returns `None` when the sequence carries no
    /// indexed loci at all.
    pub fn search(
        &self,
        sequence_id: &str,
        start: u64,
        end: u64,
        strict: bool,
    ) -> Option<Vec<Arc<Locus>>> {
        let lapper = self.trees.get(sequence_id)?;

        let hits = lapper
            .find(start, end)
            .filter(|iv| !strict || (iv.start <= start && iv.stop >= end))
            .map(|iv| Arc::clone(&iv.val))
            .collect();

        Some(hits)
    }

    /// Iterate all indexed loci, by sequence id then by position
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Locus>> {
        self.trees
            .values()
            .flat_map(|lapper| lapper.iter().map(|iv| &iv.val))
    }

    /// Check if a sequence exists in the index
    pub fn has_sequence(&self, sequence_id: &str) -> bool {
        self.trees.contains_key(sequence_id)
    }

    /// Get all indexed sequence ids
    pub fn sequence_ids(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(|s| s.as_str())
    }

    /// Get the number of loci on a sequence
    pub fn locus_count(&self, sequence_id: &str) -> usize {
        self.trees.get(sequence_id).map(|l| l.len()).unwrap_or(0)
    }

    /// Get total number of loci across all sequences
    pub fn total_loci(&self) -> usize {
        self.trees.values().map(|l| l.len()).sum()
    }
}

fn to_interval(locus: &Arc<Locus>) -> LocusInterval {
    Interval {
        start: locus.start(),
        stop: locus.end(),
        val: Arc::clone(locus),
    }
}
