//! Reciprocal-overlap resolution of alignment candidates
//!
//! An alignment of a query iLocus against the subject assembly is projected
//! onto the subject loci it touches. A candidate subject locus is a valid
//! mapping when the aligned subject span covers at least 90% of the query
//! locus and at least 90% of the candidate.

use crate::core::alignment::AlignmentRecord;
use crate::core::index::LocusIndex;
use crate::core::locus::Locus;
use log::debug;
use std::sync::Arc;

/// Minimum overlap fraction required on both sides of a mapping
pub const RECIPROCAL_OVERLAP_THRESHOLD: f64 = 0.90;

/// How candidate subject loci are retrieved from the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Any locus overlapping the aligned subject span is a candidate
    #[default]
    Overlap,
    /// Only loci that fully contain the aligned subject span are candidates
    Containment,
}

impl MatchMode {
    /// Whether index queries use containment semantics
    pub fn is_strict(&self) -> bool {
        matches!(self, MatchMode::Containment)
    }
}

/// Resolver configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    pub match_mode: MatchMode,
}

/// Length of the intersection of two half-open intervals, 0 if disjoint
pub fn overlap_length(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> u64 {
    a_end.min(b_end).saturating_sub(a_start.max(b_start))
}

/// Overlap fractions of one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    pub overlap: u64,
    /// Overlap relative to the query locus length
    pub query_fraction: f64,
    /// Overlap relative to the subject locus length
    pub subject_fraction: f64,
}

impl CandidateScore {
    /// Score an overlap against both locus lengths
    ///
    /// Lengths come from validated loci and are never zero.
    pub fn new(overlap: u64, query_len: u64, subject_len: u64) -> Self {
        Self {
            overlap,
            query_fraction: overlap as f64 / query_len as f64,
            subject_fraction: overlap as f64 / subject_len as f64,
        }
    }

    /// Both fractions reach the reciprocal threshold
    pub fn is_reciprocal(&self) -> bool {
        self.query_fraction >= RECIPROCAL_OVERLAP_THRESHOLD
            && self.subject_fraction >= RECIPROCAL_OVERLAP_THRESHOLD
    }
}

/// Decides which candidate subject loci are valid mappings of a query locus
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapResolver {
    config: ResolverConfig,
}

impl OverlapResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Fetch candidate subject loci for the alignment's subject span
    ///
    /// Returns `None` when the subject sequence carries no indexed loci.
    pub fn candidates(
        &self,
        index: &LocusIndex,
        alignment: &AlignmentRecord,
    ) -> Option<Vec<Arc<Locus>>> {
        index.search(
            &alignment.subject_seqid,
            alignment.subject_start(),
            alignment.subject_end(),
            self.config.match_mode.is_strict(),
        )
    }

    /// Score a single candidate against the alignment and its query locus
    pub fn score(&self, alignment: &AlignmentRecord, query: &Locus, subject: &Locus) -> CandidateScore {
        let overlap = overlap_length(
            alignment.subject_start(),
            alignment.subject_end(),
            subject.start(),
            subject.end(),
        );
        CandidateScore::new(overlap, query.len(), subject.len())
    }

    /// Filter candidates down to valid reciprocal mappings
    ///
    /// Returns `None` when there are no candidates or when none passes the
    /// threshold. Accepted loci are sorted by label.
    pub fn resolve(
        &self,
        alignment: &AlignmentRecord,
        query: &Locus,
        candidates: Option<&[Arc<Locus>]>,
    ) -> Option<Vec<Arc<Locus>>> {
        let candidates = candidates?;

        let mut accepted: Vec<Arc<Locus>> = candidates
            .iter()
            .filter(|subject| {
                let score = self.score(alignment, query, subject);
                debug!(
                    "Candidate mapping: query={}[{}] subject={}[{}] qovlp={:.4} sovlp={:.4}",
                    query.label(),
                    query,
                    subject.label(),
                    subject,
                    score.query_fraction,
                    score.subject_fraction,
                );
                score.is_reciprocal()
            })
            .cloned()
            .collect();

        if accepted.is_empty() {
            return None;
        }
        accepted.sort_by(|a, b| a.label().cmp(b.label()));
        Some(accepted)
    }
}
