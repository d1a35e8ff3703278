//! iLocus mapping pipeline
//!
//! Ties the pieces together in the order the batch run needs them:
//! 1. Index the subject loci per sequence
//! 2. For each alignment, bind the query locus named by the alignment
//! 3. Fetch overlapping subject loci and keep the reciprocal ones
//! 4. Accumulate outcomes, then report every locus on both sides

use crate::core::aggregator::{MappingAggregator, MappingReport};
use crate::core::alignment::AlignmentRecord;
use crate::core::error::{MappingError, MappingResult};
use crate::core::index::LocusIndex;
use crate::core::locus::{Locus, LocusRepository};
use crate::core::resolver::{OverlapResolver, ResolverConfig};
use log::{debug, info};
use std::sync::Arc;

/// Outcome of resolving one alignment
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutcome {
    pub query: Arc<Locus>,
    /// Accepted subject loci sorted by label, `None` if unmapped
    pub subjects: Option<Vec<Arc<Locus>>>,
}

impl AlignmentOutcome {
    /// Labels of the accepted subject loci
    pub fn subject_labels(&self) -> Option<Vec<&str>> {
        self.subjects
            .as_ref()
            .map(|subjects| subjects.iter().map(|s| s.label()).collect())
    }
}

/// Counters collected while processing alignments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStats {
    /// Alignments processed
    pub total: usize,
    /// Alignments whose subject sequence carries no loci
    pub unknown_sequence: usize,
    /// Alignments with at least one geometric candidate
    pub with_candidates: usize,
    /// Alignments yielding at least one valid mapping
    pub accepted: usize,
    /// Alignments with candidates that all failed the threshold
    pub rejected: usize,
}

/// Orchestrates resolution of an alignment stream against two assemblies
pub struct IlocusMapper {
    query: LocusRepository,
    subject: LocusRepository,
    index: LocusIndex,
    resolver: OverlapResolver,
    aggregator: MappingAggregator,
    stats: MappingStats,
}

impl IlocusMapper {
    /// Create a mapper, indexing every subject locus
    pub fn new(query: LocusRepository, subject: LocusRepository, config: ResolverConfig) -> Self {
        let index = LocusIndex::from_loci(&subject);
        info!(
            "Indexed {} subject iLoci on {} sequences",
            index.total_loci(),
            index.sequence_ids().count()
        );

        Self {
            query,
            subject,
            index,
            resolver: OverlapResolver::new(config),
            aggregator: MappingAggregator::new(),
            stats: MappingStats::default(),
        }
    }

    pub fn query_loci(&self) -> &LocusRepository {
        &self.query
    }

    pub fn subject_loci(&self) -> &LocusRepository {
        &self.subject
    }

    pub fn index(&self) -> &LocusIndex {
        &self.index
    }

    pub fn stats(&self) -> &MappingStats {
        &self.stats
    }

    /// Resolve one alignment and record its outcome
    ///
    /// The alignment's query sequence id must name a loaded query locus.
    pub fn process(&mut self, alignment: &AlignmentRecord) -> MappingResult<AlignmentOutcome> {
        let query = self
            .query
            .get(&alignment.query_seqid)
            .cloned()
            .ok_or_else(|| MappingError::UnboundQueryLocus(alignment.query_seqid.clone()))?;

        self.stats.total += 1;

        let candidates = self.resolver.candidates(&self.index, alignment);
        match &candidates {
            None => {
                debug!(
                    "No subject iLoci on sequence {} for query {}",
                    alignment.subject_seqid,
                    query.label()
                );
                self.stats.unknown_sequence += 1;
            }
            Some(c) if !c.is_empty() => self.stats.with_candidates += 1,
            Some(_) => {}
        }

        let subjects = self
            .resolver
            .resolve(alignment, &query, candidates.as_deref());
        match &subjects {
            Some(_) => self.stats.accepted += 1,
            None if candidates.as_ref().map_or(false, |c| !c.is_empty()) => {
                self.stats.rejected += 1
            }
            None => {}
        }

        self.aggregator.record(query.label(), subjects.as_deref());

        Ok(AlignmentOutcome { query, subjects })
    }

    /// Resolve a whole alignment stream, stopping at the first error
    pub fn process_all<I, E>(&mut self, alignments: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<AlignmentRecord, E>>,
        E: From<MappingError>,
    {
        for alignment in alignments {
            self.process(&alignment?)?;
        }
        Ok(())
    }

    /// Report every query and subject locus
    pub fn report(&self) -> MappingReport {
        self.aggregator.finalize(&self.query, &self.subject)
    }

    /// Consume the mapper and produce the final report
    pub fn finish(self) -> MappingReport {
        self.report()
    }
}
