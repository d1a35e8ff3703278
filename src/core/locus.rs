//! iLocus entities and per-assembly locus repositories
//!
//! Coordinates are 0-based half-open `[start, end)`. Conversion from the
//! 1-based closed GFF3 convention happens in the GFF reader.

use crate::core::error::LocusError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An annotated genomic interval with a unique label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus {
    sequence_id: String,
    start: u64,
    end: u64,
    label: String,
}

impl Locus {
    /// Create a locus, rejecting empty intervals and empty labels
    ///
    /// # Examples
    /// ```
    /// use ilocus_mapper::core::Locus;
    /// let locus = Locus::new("chr1", 100, 200, "Q1").unwrap();
    /// assert_eq!(locus.len(), 100);
    /// assert!(Locus::new("chr1", 200, 200, "Q2").is_err());
    /// ```
    pub fn new(
        sequence_id: impl Into<String>,
        start: u64,
        end: u64,
        label: impl Into<String>,
    ) -> Result<Self, LocusError> {
        let sequence_id = sequence_id.into();
        let label = label.into();

        if label.is_empty() {
            return Err(LocusError::MissingLabel {
                sequence_id,
                start,
                end,
            });
        }
        if end <= start {
            return Err(LocusError::EmptyInterval { label, start, end });
        }

        Ok(Self {
            sequence_id,
            start,
            end,
            label,
        })
    }

    pub fn sequence_id(&self) -> &str {
        &self.sequence_id
    }

    /// Start position (0-based, inclusive)
    pub fn start(&self) -> u64 {
        self.start
    }

    /// End position (exclusive)
    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Interval length, always > 0
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for Locus {
    /// Formats as `seq:start-end` in 1-based closed notation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.sequence_id, self.start + 1, self.end)
    }
}

/// Owned collection of the loci of one assembly, with lookup by label
///
/// Loci are shared with the interval index through `Arc`, the repository
/// remains the collection that materialised them.
#[derive(Debug, Clone, Default)]
pub struct LocusRepository {
    loci: Vec<Arc<Locus>>,
    by_label: HashMap<String, usize>,
}

impl LocusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from a sequence of loci
    pub fn from_loci<I>(loci: I) -> Result<Self, LocusError>
    where
        I: IntoIterator<Item = Locus>,
    {
        let mut repository = Self::new();
        for locus in loci {
            repository.insert(locus)?;
        }
        Ok(repository)
    }

    /// Register a locus; labels must be unique
    pub fn insert(&mut self, locus: Locus) -> Result<Arc<Locus>, LocusError> {
        if self.by_label.contains_key(locus.label()) {
            return Err(LocusError::DuplicateLabel(locus.label().to_string()));
        }
        let locus = Arc::new(locus);
        self.by_label
            .insert(locus.label().to_string(), self.loci.len());
        self.loci.push(Arc::clone(&locus));
        Ok(locus)
    }

    /// Look up a locus by label
    pub fn get(&self, label: &str) -> Option<&Arc<Locus>> {
        self.by_label.get(label).map(|&idx| &self.loci[idx])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    /// Iterate loci in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Locus>> {
        self.loci.iter()
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocusRepository {
    type Item = &'a Arc<Locus>;
    type IntoIter = std::slice::Iter<'a, Arc<Locus>>;

    fn into_iter(self) -> Self::IntoIter {
        self.loci.iter()
    }
}
