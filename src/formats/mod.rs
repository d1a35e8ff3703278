//! File format adapters
//!
//! Readers for iLocus GFF3 annotations, vmatch alignments and FASTA
//! sequences, plus the text report writers.

pub mod fasta;
pub mod gff;
pub mod report;
pub mod vmatch;

pub use fasta::{read_id_list, select_sequences, FastaReader, FastaRecord, SelectionStats};
pub use gff::{locus_type_counts, read_iloci, GffParseError, GffRecordView, IlocusReader};
pub use report::{write_alignment_outcome, write_mapping_report, write_type_counts, write_unmapped_subjects};
pub use vmatch::{parse_vmatch_line, VmatchParseError, VmatchReader};
