//! vmatch alignment reader
//!
//! vmatch reports one match per line as space-aligned columns:
//!
//! ```text
//! # args=-q query.fa -d -p -l 50 subject
//!   100   chrA   100 D   100   Q1     0    0   1.23e-50    200 100.00
//! ```
//!
//! Columns: subject length, subject sequence, subject position (0-based),
//! strand (`D` direct / `P` palindromic), query length, query sequence,
//! query position, edit distance, E-value, score, percent identity.

use crate::core::{AlignmentRecord, AlignmentStrand, ParseError, ParseResult};
use std::io::BufRead;
use std::str::FromStr;

/// Number of columns in a vmatch match line
pub const VMATCH_FIELD_COUNT: usize = 11;

/// vmatch line parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmatchParseError {
    TooFewFields { expected: usize, found: usize },
    InvalidNumber(&'static str, String),
    InvalidStrand(String),
    /// Position plus length does not fit in a coordinate
    SpanOverflow(&'static str),
}

impl std::fmt::Display for VmatchParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VmatchParseError::TooFewFields { expected, found } => {
                write!(f, "Too few fields: expected {}, found {}", expected, found)
            }
            VmatchParseError::InvalidNumber(field, value) => {
                write!(f, "Invalid number in field {}: {}", field, value)
            }
            VmatchParseError::InvalidStrand(s) => write!(f, "Invalid strand: {}", s),
            VmatchParseError::SpanOverflow(side) => {
                write!(f, "{} position plus length overflows", side)
            }
        }
    }
}

impl std::error::Error for VmatchParseError {}

fn parse_field<T: FromStr>(value: &str, name: &'static str) -> Result<T, VmatchParseError> {
    value
        .parse()
        .map_err(|_| VmatchParseError::InvalidNumber(name, value.to_string()))
}

/// Parse a single vmatch match line
pub fn parse_vmatch_line(line: &str) -> Result<AlignmentRecord, VmatchParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < VMATCH_FIELD_COUNT {
        return Err(VmatchParseError::TooFewFields {
            expected: VMATCH_FIELD_COUNT,
            found: fields.len(),
        });
    }

    let mut strand_chars = fields[3].chars();
    let strand = match (strand_chars.next(), strand_chars.next()) {
        (Some(c), None) => AlignmentStrand::from_char(c),
        _ => None,
    }
    .ok_or_else(|| VmatchParseError::InvalidStrand(fields[3].to_string()))?;

    let subject_length: u64 = parse_field(fields[0], "subject length")?;
    let subject_position: u64 = parse_field(fields[2], "subject position")?;
    let query_length: u64 = parse_field(fields[4], "query length")?;
    let query_position: u64 = parse_field(fields[6], "query position")?;

    if subject_position.checked_add(subject_length).is_none() {
        return Err(VmatchParseError::SpanOverflow("subject"));
    }
    if query_position.checked_add(query_length).is_none() {
        return Err(VmatchParseError::SpanOverflow("query"));
    }

    Ok(AlignmentRecord {
        subject_length,
        subject_seqid: fields[1].to_string(),
        subject_position,
        strand,
        query_length,
        query_seqid: fields[5].to_string(),
        query_position,
        distance: parse_field(fields[7], "distance")?,
        evalue: parse_field(fields[8], "evalue")?,
        score: parse_field(fields[9], "score")?,
        identity: parse_field(fields[10], "identity")?,
    })
}

/// Streaming reader yielding the alignments of a vmatch report
pub struct VmatchReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> VmatchReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for VmatchReader<R> {
    type Item = ParseResult<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(parse_vmatch_line(trimmed).map_err(|e| ParseError::InvalidAlignment {
                line: self.line_number,
                message: e.to_string(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "   100   chrA   100 D   100   Q1     0    0   1.23e-50    200 100.00";

    #[test]
    fn test_parse_vmatch_line() {
        let rec = parse_vmatch_line(LINE).unwrap();

        assert_eq!(rec.subject_length, 100);
        assert_eq!(rec.subject_seqid, "chrA");
        assert_eq!(rec.subject_position, 100);
        assert_eq!(rec.strand, AlignmentStrand::Direct);
        assert_eq!(rec.query_length, 100);
        assert_eq!(rec.query_seqid, "Q1");
        assert_eq!(rec.query_position, 0);
        assert_eq!(rec.distance, 0);
        assert!((rec.evalue - 1.23e-50).abs() < 1e-60);
        assert_eq!(rec.score, 200);
        assert!((rec.identity - 100.0).abs() < 1e-9);
        assert_eq!((rec.subject_start(), rec.subject_end()), (100, 200));
    }

    #[test]
    fn test_parse_palindromic() {
        let rec = parse_vmatch_line("50 chrB 7 P 48 Q9 2 -3 0.001 90 96.00").unwrap();
        assert_eq!(rec.strand, AlignmentStrand::Palindromic);
        assert_eq!(rec.distance, -3);
    }

    #[test]
    fn test_parse_too_few_fields() {
        let result = parse_vmatch_line("100 chrA 100 D 100 Q1");
        assert_eq!(
            result.unwrap_err(),
            VmatchParseError::TooFewFields {
                expected: 11,
                found: 6
            }
        );
    }

    #[test]
    fn test_parse_invalid_number() {
        let result = parse_vmatch_line("100 chrA x D 100 Q1 0 0 0.0 200 100.0");
        assert_eq!(
            result.unwrap_err(),
            VmatchParseError::InvalidNumber("subject position", "x".to_string())
        );
    }

    #[test]
    fn test_parse_negative_length_rejected() {
        let result = parse_vmatch_line("-5 chrA 0 D 100 Q1 0 0 0.0 200 100.0");
        assert!(matches!(result, Err(VmatchParseError::InvalidNumber("subject length", _))));
    }

    #[test]
    fn test_parse_span_overflow() {
        let result = parse_vmatch_line("18446744073709551615 chrA 5 D 100 Q1 0 0 0.0 200 100.0");
        assert_eq!(result.unwrap_err(), VmatchParseError::SpanOverflow("subject"));

        let result = parse_vmatch_line("100 chrA 5 D 18446744073709551615 Q1 1 0 0.0 200 100.0");
        assert_eq!(result.unwrap_err(), VmatchParseError::SpanOverflow("query"));

        // Largest span that still fits
        let rec = parse_vmatch_line("18446744073709551610 chrA 5 D 100 Q1 0 0 0.0 200 100.0").unwrap();
        assert_eq!(rec.subject_end(), u64::MAX);
    }

    #[test]
    fn test_reader_rejects_overflowing_span() {
        let data = format!("{}\n18446744073709551615 chrA 5 D 100 Q1 0 0 0.0 200 100.0\n", LINE);
        let err = VmatchReader::new(data.as_bytes())
            .collect::<ParseResult<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidAlignment { line: 2, .. }));
    }

    #[test]
    fn test_parse_invalid_strand() {
        let result = parse_vmatch_line("100 chrA 0 + 100 Q1 0 0 0.0 200 100.0");
        assert!(matches!(result, Err(VmatchParseError::InvalidStrand(_))));
    }

    #[test]
    fn test_reader_skips_comments() {
        let data = format!("# args=-q q.fa -d s\n\n{}\n{}\n", LINE, LINE.replace("Q1", "Q2"));
        let records: Vec<AlignmentRecord> = VmatchReader::new(data.as_bytes())
            .collect::<ParseResult<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].query_seqid, "Q2");
    }

    #[test]
    fn test_reader_reports_line_number() {
        let data = format!("# header\n{}\n100 chrA\n", LINE);
        let err = VmatchReader::new(data.as_bytes())
            .collect::<ParseResult<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidAlignment { line: 3, .. }));
    }
}
