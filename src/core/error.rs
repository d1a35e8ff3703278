//! Error types for iLocusMapper
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for iLocusMapper operations
#[derive(Debug, Error)]
pub enum IlocusMapError {
    /// Input parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid locus definitions
    #[error("Locus error: {0}")]
    Locus(#[from] LocusError),

    /// Alignment resolution errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading annotation, alignment or sequence input
#[derive(Debug, Error)]
pub enum ParseError {
    /// Invalid GFF3 record
    #[error("Invalid GFF3 record at line {line}: {message}")]
    InvalidGff { line: usize, message: String },

    /// Invalid alignment record
    #[error("Invalid alignment record at line {line}: {message}")]
    InvalidAlignment { line: usize, message: String },

    /// Invalid FASTA data
    #[error("Invalid FASTA data at line {line}: {message}")]
    InvalidFasta { line: usize, message: String },

    /// Record parsed but does not describe a valid locus
    #[error("Invalid locus at line {line}: {source}")]
    InvalidLocus {
        line: usize,
        #[source]
        source: LocusError,
    },

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when constructing or registering a locus
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocusError {
    /// Interval must satisfy end > start
    #[error("Empty interval for locus '{label}': [{start}, {end})")]
    EmptyInterval { label: String, start: u64, end: u64 },

    /// Label is required and used as a map key
    #[error("Locus on {sequence_id} at [{start}, {end}) has no label")]
    MissingLabel {
        sequence_id: String,
        start: u64,
        end: u64,
    },

    /// Labels must be unique within one assembly
    #[error("Duplicate locus label: {0}")]
    DuplicateLabel(String),
}

/// Errors that can occur while resolving alignments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Alignment references a query sequence with no loaded locus
    #[error("Unbound query locus: no query iLocus labelled '{0}'")]
    UnboundQueryLocus(String),
}

/// Result type alias for iLocusMapper operations
pub type Result<T> = std::result::Result<T, IlocusMapError>;

/// Result type alias for parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for mapping operations
pub type MappingResult<T> = std::result::Result<T, MappingError>;
