//! Core iLocus mapping functionality
//!
//! This module contains the locus entities, the per-sequence interval
//! index, reciprocal-overlap resolution and mapping aggregation. Nothing in
//! here formats output; `io` only opens inputs and outputs.

mod aggregator;
mod alignment;
mod error;
mod index;
pub mod io;
mod locus;
mod pipeline;
mod resolver;

pub use aggregator::{MappingAggregator, MappingReport, QueryMapping};
pub use alignment::{AlignmentRecord, AlignmentStrand};
pub use error::{
    IlocusMapError, LocusError, MappingError, MappingResult, ParseError, ParseResult, Result,
};
pub use index::{LocusIndex, LocusInterval};
pub use io::{detect_compression, open_input, open_output, CompressionFormat, DEFAULT_BUFFER_SIZE};
pub use locus::{Locus, LocusRepository};
pub use pipeline::{AlignmentOutcome, IlocusMapper, MappingStats};
pub use resolver::{
    overlap_length, CandidateScore, MatchMode, OverlapResolver, ResolverConfig,
    RECIPROCAL_OVERLAP_THRESHOLD,
};
