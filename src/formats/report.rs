//! Text rendering of mapping results
//!
//! Every line has two tab-separated columns, query label then subject
//! labels. Multiple subject labels are comma-joined and a missing side is
//! written as `None`.

use crate::core::{AlignmentOutcome, MappingReport};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Placeholder for the unmapped side of a line
pub const UNMAPPED: &str = "None";

/// Write the full reconciliation report
///
/// Query lines come first (sorted by query label), then one `None\tSUBJECT`
/// line per unmapped subject locus.
pub fn write_mapping_report<W: Write>(out: &mut W, report: &MappingReport) -> io::Result<()> {
    for mapping in &report.query_mappings {
        match &mapping.subject_labels {
            Some(labels) => writeln!(out, "{}\t{}", mapping.query_label, labels.join(","))?,
            None => writeln!(out, "{}\t{}", mapping.query_label, UNMAPPED)?,
        }
    }
    write_unmapped_subjects(out, &report.unmapped_subjects)
}

/// Write one line per alignment outcome
pub fn write_alignment_outcome<W: Write>(out: &mut W, outcome: &AlignmentOutcome) -> io::Result<()> {
    match outcome.subject_labels() {
        Some(labels) => writeln!(out, "{}\t{}", outcome.query.label(), labels.join(",")),
        None => writeln!(out, "{}\t{}", outcome.query.label(), UNMAPPED),
    }
}

pub fn write_unmapped_subjects<W: Write>(out: &mut W, labels: &[String]) -> io::Result<()> {
    for label in labels {
        writeln!(out, "{}\t{}", UNMAPPED, label)?;
    }
    Ok(())
}

/// Write `TYPE: COUNT` lines followed by the total
pub fn write_type_counts<W: Write>(out: &mut W, counts: &BTreeMap<String, usize>) -> io::Result<()> {
    let mut total = 0;
    for (locus_type, count) in counts {
        writeln!(out, "{}: {}", locus_type, count)?;
        total += count;
    }
    writeln!(out, "Total: {}", total)
}
