//! iLocusMapper - reciprocal-overlap reconciliation of iLocus annotations
//!
//! Maps the iLoci of one genome assembly (query) onto the iLoci of another
//! (subject) using pairwise alignments of the query iLocus sequences against
//! the subject genome.
//!
//! # Features
//!
//! - Per-sequence interval index with O(log n + k) overlap queries
//! - 90% reciprocal-overlap validation of every candidate mapping
//! - Many-to-many correspondence report including unmapped loci on both sides
//! - Support for compressed inputs (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use ilocus_mapper::{IlocusMapper, ResolverConfig};
//! use ilocus_mapper::core::open_input;
//! use ilocus_mapper::formats::{read_iloci, VmatchReader};
//!
//! let query = read_iloci(open_input("query.iloci.gff3")?)?;
//! let subject = read_iloci(open_input("subject.iloci.gff3")?)?;
//!
//! let mut mapper = IlocusMapper::new(query, subject, ResolverConfig::default());
//! for alignment in VmatchReader::new(open_input("query-vs-subject.vmatch")?) {
//!     mapper.process(&alignment?)?;
//! }
//! let report = mapper.finish();
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    AlignmentOutcome, AlignmentRecord, AlignmentStrand, IlocusMapError, IlocusMapper, Locus,
    LocusError, LocusIndex, LocusRepository, MappingAggregator, MappingError, MappingReport,
    MatchMode, OverlapResolver, ParseError, QueryMapping, ResolverConfig,
    RECIPROCAL_OVERLAP_THRESHOLD,
};
