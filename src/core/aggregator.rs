//! Accumulation of resolved mappings into the final correspondence report

use crate::core::locus::Locus;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

/// Final mapping of one query locus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMapping {
    pub query_label: String,
    /// Sorted subject labels, `None` when unmapped
    pub subject_labels: Option<Vec<String>>,
}

impl QueryMapping {
    pub fn is_mapped(&self) -> bool {
        self.subject_labels.is_some()
    }
}

/// Complete locus correspondence between the two assemblies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingReport {
    /// One entry per query locus, sorted by query label
    pub query_mappings: Vec<QueryMapping>,
    /// Subject loci referenced by no accepted mapping, sorted by label
    pub unmapped_subjects: Vec<String>,
}

impl MappingReport {
    /// Number of query loci with at least one subject mapping
    pub fn mapped_query_count(&self) -> usize {
        self.query_mappings.iter().filter(|m| m.is_mapped()).count()
    }
}

/// Accumulates per-query-locus results across all alignments
#[derive(Debug, Clone, Default)]
pub struct MappingAggregator {
    /// Query label -> union of accepted subject labels
    mapping: BTreeMap<String, BTreeSet<String>>,
}

impl MappingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolution outcome for a query locus
    ///
    /// The query locus is marked as observed even when `subjects` is `None`.
    /// Repeated calls for the same label take the union.
    pub fn record(&mut self, query_label: &str, subjects: Option<&[Arc<Locus>]>) {
        let entry = self.mapping.entry(query_label.to_string()).or_default();
        for subject in subjects.unwrap_or_default() {
            entry.insert(subject.label().to_string());
        }
    }

    /// Whether `record` has been called for a query label
    pub fn is_observed(&self, query_label: &str) -> bool {
        self.mapping.contains_key(query_label)
    }

    /// Number of distinct query loci observed so far
    pub fn observed_count(&self) -> usize {
        self.mapping.len()
    }

    /// Produce the report for every query and subject locus
    ///
    /// Query loci never recorded are reported unmapped, as are subject loci
    /// absent from every accumulated result.
    pub fn finalize<'q, 's, Q, S>(&self, all_query_loci: Q, all_subject_loci: S) -> MappingReport
    where
        Q: IntoIterator<Item = &'q Arc<Locus>>,
        S: IntoIterator<Item = &'s Arc<Locus>>,
    {
        let mut query_mappings: Vec<QueryMapping> = self
            .mapping
            .iter()
            .map(|(label, subjects)| QueryMapping {
                query_label: label.clone(),
                subject_labels: if subjects.is_empty() {
                    None
                } else {
                    Some(subjects.iter().cloned().collect())
                },
            })
            .collect();

        for locus in all_query_loci {
            if !self.mapping.contains_key(locus.label()) {
                query_mappings.push(QueryMapping {
                    query_label: locus.label().to_string(),
                    subject_labels: None,
                });
            }
        }
        query_mappings.sort_by(|a, b| a.query_label.cmp(&b.query_label));

        let referenced: HashSet<&str> = self
            .mapping
            .values()
            .flat_map(|subjects| subjects.iter().map(|s| s.as_str()))
            .collect();

        let mut unmapped_subjects: Vec<String> = all_subject_loci
            .into_iter()
            .filter(|locus| !referenced.contains(locus.label()))
            .map(|locus| locus.label().to_string())
            .collect();
        unmapped_subjects.sort_unstable();
        unmapped_subjects.dedup();

        MappingReport {
            query_mappings,
            unmapped_subjects,
        }
    }
}
