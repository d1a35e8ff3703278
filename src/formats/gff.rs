//! GFF3 iLocus reader
//!
//! iLoci are GFF3 records of feature type `locus` whose `Name` attribute
//! carries the locus label. GFF3 uses 1-based closed coordinates, loci are
//! converted to 0-based half-open intervals on the way in.

use crate::core::{Locus, LocusRepository, ParseError, ParseResult};
use memchr::memchr;
use std::collections::{BTreeMap, HashSet};
use std::io::BufRead;

/// Feature type of iLocus records
pub const LOCUS_FEATURE_TYPE: &str = "locus";

/// Attribute holding the iLocus label
pub const LABEL_ATTRIBUTE: &str = "Name";

/// Attribute holding the iLocus classification
pub const TYPE_ATTRIBUTE: &str = "iLocus_type";

/// Directive starting the embedded sequence section; no records follow it
pub const FASTA_DIRECTIVE: &str = "##FASTA";

/// GFF3 line parse error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GffParseError {
    EmptyLine,
    WrongFieldCount { expected: usize, found: usize },
    InvalidNumber(&'static str, String),
    InvalidAttribute(String),
}

impl std::fmt::Display for GffParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GffParseError::EmptyLine => write!(f, "Empty line"),
            GffParseError::WrongFieldCount { expected, found } => {
                write!(f, "Wrong field count: expected {}, found {}", expected, found)
            }
            GffParseError::InvalidNumber(field, value) => {
                write!(f, "Invalid number in field {}: {}", field, value)
            }
            GffParseError::InvalidAttribute(s) => write!(f, "Invalid attribute: {}", s),
        }
    }
}

impl std::error::Error for GffParseError {}

/// Zero-copy GFF3 record view
/// GFF3 format: seqid, source, type, start, end, score, strand, phase, attributes
/// All coordinates are 1-based, closed interval [start, end]
#[derive(Debug, Clone)]
pub struct GffRecordView<'a> {
    pub seqid: &'a str,
    pub source: &'a str,
    pub feature: &'a str,
    /// Start position (1-based)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    pub score: &'a str,
    pub strand: &'a str,
    pub phase: &'a str,
    pub attributes: &'a str,
}

impl<'a> GffRecordView<'a> {
    /// Parse a GFF3 line; exactly 9 tab-separated fields are required
    pub fn parse(line: &'a str) -> Result<Self, GffParseError> {
        if line.is_empty() {
            return Err(GffParseError::EmptyLine);
        }

        let bytes = line.as_bytes();
        let mut fields: Vec<&'a str> = Vec::with_capacity(9);
        let mut pos = 0;
        while let Some(tab_pos) = memchr(b'\t', &bytes[pos..]) {
            fields.push(&line[pos..pos + tab_pos]);
            pos += tab_pos + 1;
        }
        fields.push(&line[pos..]);

        if fields.len() != 9 {
            return Err(GffParseError::WrongFieldCount {
                expected: 9,
                found: fields.len(),
            });
        }

        let start: u64 = fields[3]
            .parse()
            .map_err(|_| GffParseError::InvalidNumber("start", fields[3].to_string()))?;
        let end: u64 = fields[4]
            .parse()
            .map_err(|_| GffParseError::InvalidNumber("end", fields[4].to_string()))?;

        Ok(Self {
            seqid: fields[0],
            source: fields[1],
            feature: fields[2],
            start,
            end,
            score: fields[5],
            strand: fields[6],
            phase: fields[7],
            attributes: fields[8],
        })
    }

    /// Iterate `key=value` attribute pairs
    pub fn attribute_pairs(&self) -> impl Iterator<Item = Result<(&'a str, &'a str), GffParseError>> {
        self.attributes
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty() && *pair != ".")
            .map(|pair| {
                pair.split_once('=')
                    .ok_or_else(|| GffParseError::InvalidAttribute(pair.to_string()))
            })
    }

    /// Look up a single attribute value
    pub fn attribute(&self, key: &str) -> Result<Option<&'a str>, GffParseError> {
        for pair in self.attribute_pairs() {
            let (k, v) = pair?;
            if k == key {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    pub fn is_locus(&self) -> bool {
        self.feature == LOCUS_FEATURE_TYPE
    }

    /// Convert to a half-open locus labelled by the `Name` attribute
    ///
    /// Returns `Ok(None)` for records that are not iLoci.
    pub fn to_locus(&self, line_number: usize) -> ParseResult<Option<Locus>> {
        if !self.is_locus() {
            return Ok(None);
        }

        let label = self
            .attribute(LABEL_ATTRIBUTE)
            .map_err(|e| invalid_gff(line_number, e))?
            .ok_or_else(|| ParseError::InvalidGff {
                line: line_number,
                message: format!("locus record has no {} attribute", LABEL_ATTRIBUTE),
            })?;

        if self.start == 0 {
            return Err(ParseError::InvalidGff {
                line: line_number,
                message: "start coordinate must be 1-based (>= 1)".to_string(),
            });
        }

        // [start, end] 1-based closed -> [start - 1, end) 0-based half-open
        Locus::new(self.seqid, self.start - 1, self.end, label)
            .map(Some)
            .map_err(|source| ParseError::InvalidLocus {
                line: line_number,
                source,
            })
    }
}

fn invalid_gff(line: usize, error: GffParseError) -> ParseError {
    ParseError::InvalidGff {
        line,
        message: error.to_string(),
    }
}

/// Skip blank lines, comments and directives
fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

fn is_fasta_directive(line: &str) -> bool {
    line.trim_end() == FASTA_DIRECTIVE
}

/// Streaming reader yielding the iLoci of a GFF3 source
///
/// Reading stops at a `##FASTA` directive.
pub struct IlocusReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> IlocusReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for IlocusReader<R> {
    type Item = ParseResult<Locus>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            let line = line.trim_end_matches('\r');
            if is_fasta_directive(line) {
                self.done = true;
                return None;
            }
            if is_skippable(line) {
                continue;
            }

            let result = GffRecordView::parse(line)
                .map_err(|e| invalid_gff(self.line_number, e))
                .and_then(|view| view.to_locus(self.line_number));

            match result {
                Ok(Some(locus)) => return Some(Ok(locus)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Load all iLoci of one assembly into a repository
pub fn read_iloci<R: BufRead>(reader: R) -> ParseResult<LocusRepository> {
    let mut repository = LocusRepository::new();
    let mut iloci = IlocusReader::new(reader);

    while let Some(locus) = iloci.next() {
        let line = iloci.line_number;
        repository
            .insert(locus?)
            .map_err(|source| ParseError::InvalidLocus { line, source })?;
    }
    Ok(repository)
}

/// Count iLoci per `iLocus_type`
///
/// When `ids` is given, only loci whose label is listed are counted. Loci
/// without an `iLocus_type` attribute are ignored. Reading stops at a
/// `##FASTA` directive.
pub fn locus_type_counts<R: BufRead>(
    reader: R,
    ids: Option<&HashSet<String>>,
) -> ParseResult<BTreeMap<String, usize>> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_number = idx + 1;
        let line = line?;
        let line = line.trim_end_matches('\r');
        if is_fasta_directive(line) {
            break;
        }
        if is_skippable(line) {
            continue;
        }

        let view = GffRecordView::parse(line).map_err(|e| invalid_gff(line_number, e))?;
        if !view.is_locus() {
            continue;
        }

        let locus_type = match view
            .attribute(TYPE_ATTRIBUTE)
            .map_err(|e| invalid_gff(line_number, e))?
        {
            Some(t) => t,
            None => continue,
        };

        if let Some(ids) = ids {
            let label = view
                .attribute(LABEL_ATTRIBUTE)
                .map_err(|e| invalid_gff(line_number, e))?
                .ok_or_else(|| ParseError::InvalidGff {
                    line: line_number,
                    message: format!("locus record has no {} attribute", LABEL_ATTRIBUTE),
                })?;
            if !ids.contains(label) {
                continue;
            }
        }

        *counts.entry(locus_type.to_string()).or_insert(0) += 1;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LocusError;

    const GFF: &str = "##gff-version 3\n\
chr1\tAEGeAn::iLocusParser\tlocus\t101\t200\t.\t+\t.\tID=locus1;Name=Q1;iLocus_type=siLocus\n\
chr1\tAEGeAn::iLocusParser\tgene\t120\t180\t.\t+\t.\tID=gene1;Parent=locus1\n\
chr1\tAEGeAn::iLocusParser\tlocus\t201\t450\t.\t.\t.\tID=locus2;Name=Q2;iLocus_type=iiLocus\n\
###\n\
chr2\tAEGeAn::iLocusParser\tlocus\t1\t50\t.\t-\t.\tID=locus3;Name=Q3;iLocus_type=siLocus\n";

    #[test]
    fn test_gff_record_view_basic() {
        let line = "chr1\tAEGeAn\tlocus\t1000\t2000\t.\t+\t.\tID=locus1;Name=iLocus1";
        let view = GffRecordView::parse(line).unwrap();

        assert_eq!(view.seqid, "chr1");
        assert_eq!(view.source, "AEGeAn");
        assert_eq!(view.feature, "locus");
        assert_eq!(view.start, 1000);
        assert_eq!(view.end, 2000);
        assert_eq!(view.strand, "+");
        assert_eq!(view.attribute("Name").unwrap(), Some("iLocus1"));
        assert_eq!(view.attribute("Parent").unwrap(), None);
        assert!(view.is_locus());
    }

    #[test]
    fn test_gff_record_view_wrong_field_count() {
        let result = GffRecordView::parse("chr1\tAEGeAn\tlocus\t1000\t2000");
        assert_eq!(
            result.unwrap_err(),
            GffParseError::WrongFieldCount {
                expected: 9,
                found: 5
            }
        );

        let result = GffRecordView::parse("a\tb\tc\t1\t2\t.\t+\t.\tID=x\textra");
        assert!(matches!(result, Err(GffParseError::WrongFieldCount { found: 10, .. })));
    }

    #[test]
    fn test_gff_record_view_invalid_number() {
        let result = GffRecordView::parse("chr1\t.\tlocus\tabc\t2000\t.\t+\t.\tName=x");
        assert!(matches!(result, Err(GffParseError::InvalidNumber("start", _))));
    }

    #[test]
    fn test_gff_record_view_empty_line() {
        assert_eq!(GffRecordView::parse("").unwrap_err(), GffParseError::EmptyLine);
    }

    #[test]
    fn test_attribute_without_value() {
        let view = GffRecordView::parse("chr1\t.\tlocus\t1\t10\t.\t+\t.\tID=x;broken").unwrap();
        assert!(matches!(
            view.attribute("Name"),
            Err(GffParseError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn test_trailing_semicolon_attributes() {
        let view = GffRecordView::parse("chr1\t.\tlocus\t1\t10\t.\t+\t.\tID=x;Name=y;").unwrap();
        assert_eq!(view.attribute("Name").unwrap(), Some("y"));
    }

    #[test]
    fn test_to_locus_converts_coordinates() {
        let view = GffRecordView::parse("chr1\t.\tlocus\t101\t200\t.\t+\t.\tName=Q1").unwrap();
        let locus = view.to_locus(1).unwrap().unwrap();

        assert_eq!(locus.start(), 100);
        assert_eq!(locus.end(), 200);
        assert_eq!(locus.len(), 100);
    }

    #[test]
    fn test_to_locus_single_base() {
        let view = GffRecordView::parse("chr1\t.\tlocus\t5\t5\t.\t+\t.\tName=Q1").unwrap();
        let locus = view.to_locus(1).unwrap().unwrap();
        assert_eq!((locus.start(), locus.end()), (4, 5));
    }

    #[test]
    fn test_to_locus_zero_start_rejected() {
        let view = GffRecordView::parse("chr1\t.\tlocus\t0\t100\t.\t+\t.\tName=Q1").unwrap();
        assert!(matches!(
            view.to_locus(4),
            Err(ParseError::InvalidGff { line: 4, .. })
        ));
    }

    #[test]
    fn test_to_locus_missing_name() {
        let view = GffRecordView::parse("chr1\t.\tlocus\t1\t10\t.\t+\t.\tID=x").unwrap();
        assert!(matches!(
            view.to_locus(7),
            Err(ParseError::InvalidGff { line: 7, .. })
        ));
    }

    #[test]
    fn test_to_locus_inverted_interval() {
        let view = GffRecordView::parse("chr1\t.\tlocus\t100\t50\t.\t+\t.\tName=x").unwrap();
        assert!(matches!(
            view.to_locus(3),
            Err(ParseError::InvalidLocus {
                line: 3,
                source: LocusError::EmptyInterval { .. }
            })
        ));
    }

    #[test]
    fn test_ilocus_reader() {
        let loci: Vec<Locus> = IlocusReader::new(GFF.as_bytes())
            .collect::<ParseResult<_>>()
            .unwrap();

        let labels: Vec<&str> = loci.iter().map(|l| l.label()).collect();
        assert_eq!(labels, vec!["Q1", "Q2", "Q3"]);
        assert_eq!(loci[2].sequence_id(), "chr2");
        assert_eq!((loci[2].start(), loci[2].end()), (0, 50));
    }

    #[test]
    fn test_ilocus_reader_reports_line_number() {
        let data = "##gff-version 3\nchr1\t.\tlocus\t1\t10\t.\t+\t.\tName=a\nchr1\tbroken\n";
        let err = IlocusReader::new(data.as_bytes())
            .collect::<ParseResult<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidGff { line: 3, .. }));
    }

    #[test]
    fn test_embedded_fasta_section_ends_records() {
        let data = "##gff-version 3\n\
chr1\t.\tlocus\t1\t100\t.\t+\t.\tName=Q1;iLocus_type=siLocus\n\
##FASTA\n\
>chr1\n\
ACGTACGT\n";

        let repository = read_iloci(data.as_bytes()).unwrap();
        assert_eq!(repository.len(), 1);
        assert!(repository.contains("Q1"));

        let counts = locus_type_counts(data.as_bytes(), None).unwrap();
        assert_eq!(counts.get("siLocus"), Some(&1));
        assert_eq!(counts.len(), 1);

        let mut reader = IlocusReader::new(data.as_bytes());
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_short_line_before_fasta_still_fatal() {
        let data = "chr1\t.\tlocus\t1\t100\n##FASTA\n>chr1\nACGT\n";
        assert!(matches!(
            read_iloci(data.as_bytes()),
            Err(ParseError::InvalidGff { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_iloci_duplicate_label() {
        let data = "chr1\t.\tlocus\t1\t10\t.\t+\t.\tName=a\nchr2\t.\tlocus\t1\t10\t.\t+\t.\tName=a\n";
        let err = read_iloci(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidLocus {
                line: 2,
                source: LocusError::DuplicateLabel(_)
            }
        ));
    }

    #[test]
    fn test_read_iloci_repository() {
        let repository = read_iloci(GFF.as_bytes()).unwrap();
        assert_eq!(repository.len(), 3);
        assert_eq!(repository.get("Q2").unwrap().len(), 250);
    }

    #[test]
    fn test_locus_type_counts() {
        let counts = locus_type_counts(GFF.as_bytes(), None).unwrap();
        assert_eq!(counts.get("siLocus"), Some(&2));
        assert_eq!(counts.get("iiLocus"), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_locus_type_counts_with_ids() {
        let ids: HashSet<String> = ["Q1", "Q2"].iter().map(|s| s.to_string()).collect();
        let counts = locus_type_counts(GFF.as_bytes(), Some(&ids)).unwrap();
        assert_eq!(counts.get("siLocus"), Some(&1));
        assert_eq!(counts.get("iiLocus"), Some(&1));
    }
}
