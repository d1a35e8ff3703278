//! Alignment records
//!
//! One record describes a match between a region of a query sequence and a
//! region of a subject sequence. The query sequence id names the query
//! iLocus the sequence was extracted from; binding it to a `Locus` is done by
//! the pipeline, never by the record itself.

/// Orientation of the match as reported by the alignment tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AlignmentStrand {
    /// Direct (forward) match
    #[default]
    Direct,
    /// Palindromic (reverse complement) match
    Palindromic,
}

impl AlignmentStrand {
    /// Parse strand from char
    ///
    /// # Examples
    /// ```
    /// use ilocus_mapper::core::AlignmentStrand;
    /// assert_eq!(AlignmentStrand::from_char('D'), Some(AlignmentStrand::Direct));
    /// assert_eq!(AlignmentStrand::from_char('P'), Some(AlignmentStrand::Palindromic));
    /// assert_eq!(AlignmentStrand::from_char('+'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'D' => Some(AlignmentStrand::Direct),
            'P' => Some(AlignmentStrand::Palindromic),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            AlignmentStrand::Direct => 'D',
            AlignmentStrand::Palindromic => 'P',
        }
    }
}

/// A single parsed alignment
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub subject_seqid: String,
    pub subject_length: u64,
    /// Subject start position (0-based)
    pub subject_position: u64,
    pub strand: AlignmentStrand,
    pub query_seqid: String,
    pub query_length: u64,
    /// Query start position (0-based)
    pub query_position: u64,
    /// Edit distance; 0 for exact matches
    pub distance: i64,
    pub evalue: f64,
    pub score: i64,
    /// Percent identity
    pub identity: f64,
}

impl AlignmentRecord {
    /// Start of the aligned subject span (0-based, inclusive)
    pub fn subject_start(&self) -> u64 {
        self.subject_position
    }

    /// End of the aligned subject span (exclusive)
    ///
    /// Saturates at `u64::MAX`; the vmatch reader rejects spans that overflow.
    pub fn subject_end(&self) -> u64 {
        self.subject_position.saturating_add(self.subject_length)
    }

    /// Start of the aligned query span (0-based, inclusive)
    pub fn query_start(&self) -> u64 {
        self.query_position
    }

    /// End of the aligned query span (exclusive)
    pub fn query_end(&self) -> u64 {
        self.query_position.saturating_add(self.query_length)
    }
}
