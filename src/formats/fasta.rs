//! FASTA sequence selection
//!
//! Extracts the records of a FASTA source whose identifier (the first word
//! of the defline) appears in an id list, re-wrapping sequence lines.

use crate::core::{ParseError, ParseResult};
use std::collections::HashSet;
use std::io::{BufRead, Write};

/// Default sequence line width
pub const DEFAULT_LINE_WIDTH: usize = 70;

/// A FASTA record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Defline including the leading `>`
    pub defline: String,
    pub sequence: String,
}

impl FastaRecord {
    /// First word of the defline, without `>`
    pub fn id(&self) -> &str {
        self.defline[1..].split_whitespace().next().unwrap_or("")
    }
}

/// Streaming FASTA reader
pub struct FastaReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_number: usize,
    pending: Option<String>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            pending: None,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = ParseResult<FastaRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut defline = self.pending.take();
        let mut sequence = String::new();

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return defline.map(|defline| Ok(FastaRecord { defline, sequence }));
                }
            };
            self.line_number += 1;
            let line = line.trim_end();

            if line.starts_with('>') {
                match defline {
                    Some(current) => {
                        self.pending = Some(line.to_string());
                        return Some(Ok(FastaRecord {
                            defline: current,
                            sequence,
                        }));
                    }
                    None => defline = Some(line.to_string()),
                }
            } else if defline.is_some() {
                sequence.push_str(line);
            } else if !line.is_empty() {
                self.done = true;
                return Some(Err(ParseError::InvalidFasta {
                    line: self.line_number,
                    message: "sequence data before first defline".to_string(),
                }));
            }
        }
    }
}

/// Write a sequence wrapped at `line_width` columns; 0 disables wrapping
pub fn write_sequence<W: Write>(out: &mut W, sequence: &str, line_width: usize) -> std::io::Result<()> {
    if line_width == 0 || sequence.len() <= line_width {
        return writeln!(out, "{}", sequence);
    }

    for chunk in sequence.as_bytes().chunks(line_width) {
        out.write_all(chunk)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Selection statistics
#[derive(Debug, Clone, Default)]
pub struct SelectionStats {
    pub total: usize,
    pub selected: usize,
}

/// Copy the records whose id is in `ids` from `input` to `out`
pub fn select_sequences<R: BufRead, W: Write>(
    input: R,
    ids: &HashSet<String>,
    out: &mut W,
    line_width: usize,
) -> ParseResult<SelectionStats> {
    let mut stats = SelectionStats::default();

    for record in FastaReader::new(input) {
        let record = record?;
        stats.total += 1;
        if ids.contains(record.id()) {
            writeln!(out, "{}", record.defline)?;
            write_sequence(out, &record.sequence, line_width)?;
            stats.selected += 1;
        }
    }

    Ok(stats)
}

/// Read a newline-separated id list, ignoring blank lines
pub fn read_id_list<R: BufRead>(reader: R) -> std::io::Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            ids.insert(id.to_string());
        }
    }
    Ok(ids)
}
