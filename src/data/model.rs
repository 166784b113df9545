use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Sentinels for absent categorical fields
// ---------------------------------------------------------------------------

/// Substituted when a row has no species value, so "unknowns" stay visible
/// and can be filtered out downstream rather than silently dropped.
pub const UNKNOWN_SPECIES: &str = "Unknown Species";
pub const UNKNOWN_CHEMICAL: &str = "Unknown Chemical";
pub const UNKNOWN_ENDPOINT: &str = "Unknown Endpoint";

/// The corpus starts in 1946; earlier years are noise from OCR'd front matter.
pub const FIRST_TRACKED_YEAR: i32 = 1946;

// ---------------------------------------------------------------------------
// Record – one row of the study corpus
// ---------------------------------------------------------------------------

/// A single observational row, normalized to one canonical schema at load
/// time (the source files spell the chemical column three different ways).
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub year: i32,
    pub species: String,
    pub chemical: String,
    pub endpoint: String,
}

impl Record {
    pub fn has_known_species(&self) -> bool {
        self.species != UNKNOWN_SPECIES
    }

    pub fn has_known_chemical(&self) -> bool {
        self.chemical != UNKNOWN_CHEMICAL
    }
}

// ---------------------------------------------------------------------------
// Dimension – a categorical axis used for grouping
// ---------------------------------------------------------------------------

/// A named categorical axis of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Species,
    Chemical,
    Endpoint,
}

impl Dimension {
    /// The record's value on this axis, as a grouping key.
    pub fn value_of(&self, record: &Record) -> String {
        match self {
            Dimension::Year => record.year.to_string(),
            Dimension::Species => record.species.clone(),
            Dimension::Chemical => record.chemical.clone(),
            Dimension::Endpoint => record.endpoint.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// StudyDataset – the complete loaded corpus
// ---------------------------------------------------------------------------

/// The full parsed corpus with pre-computed dimension value sets.
///
/// The value sets are derived once per load and cached sorted; filter
/// selections are always subsets of them, and color-channel assignment is
/// keyed off them so it stays stable across filter changes.
#[derive(Debug, Clone, Default)]
pub struct StudyDataset {
    /// All rows.
    pub records: Vec<Record>,
    /// Sorted unique species values (sentinel included when observed).
    pub species: BTreeSet<String>,
    /// Sorted unique chemical values.
    pub chemicals: BTreeSet<String>,
    /// Sorted unique endpoint values.
    pub endpoints: BTreeSet<String>,
    /// Observed [min, max] year, None for an empty corpus.
    pub year_span: Option<(i32, i32)>,
}

impl StudyDataset {
    /// Build the dimension value indices from the loaded rows.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut species = BTreeSet::new();
        let mut chemicals = BTreeSet::new();
        let mut endpoints = BTreeSet::new();
        let mut year_span: Option<(i32, i32)> = None;

        for r in &records {
            species.insert(r.species.clone());
            chemicals.insert(r.chemical.clone());
            endpoints.insert(r.endpoint.clone());
            year_span = Some(match year_span {
                Some((lo, hi)) => (lo.min(r.year), hi.max(r.year)),
                None => (r.year, r.year),
            });
        }

        StudyDataset {
            records,
            species,
            chemicals,
            endpoints,
            year_span,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TopicData – topic-model word weights for the word cloud
// ---------------------------------------------------------------------------

/// One weighted word of a topic-year cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordWeight {
    pub word: String,
    pub weight: f64,
}

/// The topic-model document: per-topic, per-year weighted word lists.
///
/// Wire shape: `{ "years": [1990, ...], "topics": { "0": { "1990": [{word, weight}] } } }`.
/// Year keys inside a topic are strings, mirroring the source document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicData {
    pub years: Vec<i32>,
    pub topics: BTreeMap<String, BTreeMap<String, Vec<WordWeight>>>,
}

impl TopicData {
    /// Years in ascending order (the wire order is not guaranteed).
    pub fn sorted_years(&self) -> Vec<i32> {
        let mut years = self.years.clone();
        years.sort_unstable();
        years
    }

    /// Topic ids in ascending numeric order. Non-numeric ids (not expected
    /// on the wire) sort after the numeric ones, lexicographically.
    pub fn topic_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.topics.keys().cloned().collect();
        ids.sort_by(|a, b| match (a.parse::<i64>(), b.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        });
        ids
    }

    /// The weighted words of one topic-year cell, empty when absent.
    pub fn words_for(&self, topic: &str, year: i32) -> &[WordWeight] {
        self.topics
            .get(topic)
            .and_then(|by_year| by_year.get(&year.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, species: &str) -> Record {
        Record {
            year,
            species: species.to_string(),
            chemical: UNKNOWN_CHEMICAL.to_string(),
            endpoint: UNKNOWN_ENDPOINT.to_string(),
        }
    }

    #[test]
    fn dataset_indexes_dimension_values() {
        let ds = StudyDataset::from_records(vec![
            record(1950, "Fish"),
            record(1950, "Bird"),
            record(1951, "Fish"),
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.species.iter().collect::<Vec<_>>(), vec!["Bird", "Fish"]);
        assert_eq!(ds.year_span, Some((1950, 1951)));
    }

    #[test]
    fn empty_dataset_has_no_year_span() {
        let ds = StudyDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.year_span, None);
    }

    #[test]
    fn topic_ids_sort_numerically() {
        let mut topics = BTreeMap::new();
        for id in ["2", "10", "1"] {
            topics.insert(id.to_string(), BTreeMap::new());
        }
        let data = TopicData {
            years: vec![],
            topics,
        };
        assert_eq!(data.topic_ids(), vec!["1", "2", "10"]);
    }
}
