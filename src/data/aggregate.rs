use std::collections::{BTreeMap, HashMap};

use super::model::{Dimension, Record, TopicData, WordWeight};

// ---------------------------------------------------------------------------
// Generic tuple-keyed aggregation
// ---------------------------------------------------------------------------

/// Occurrence counts keyed by a tuple of dimension values, one key per
/// observed combination. `BTreeMap` keeps iteration deterministic.
pub type AggregateCount = BTreeMap<Vec<String>, u64>;

/// Group `records` by the cartesian key formed from `dims`, in the order
/// given, and count membership. Counts always sum to `records.len()`.
pub fn aggregate(records: &[Record], dims: &[Dimension]) -> AggregateCount {
    let mut counts = AggregateCount::new();
    for r in records {
        let key: Vec<String> = dims.iter().map(|d| d.value_of(r)).collect();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Shaped aggregates, built once per dataset load
// ---------------------------------------------------------------------------

/// Species → endpoint → year nested counts (gap heatmap).
pub type GapCounts = BTreeMap<String, BTreeMap<String, BTreeMap<i32, u64>>>;

/// Year → species counts (streamgraph) and the generic (year, species)
/// pipeline.
pub type YearSpeciesCounts = BTreeMap<i32, BTreeMap<String, u64>>;

/// Species × chemical link weights (network graph).
pub type LinkCounts = BTreeMap<(String, String), u64>;

/// All per-dataset aggregates. Rebuilt only on reload; filter changes reuse
/// these and never touch the raw rows again.
#[derive(Debug, Clone, Default)]
pub struct StudyAggregates {
    pub links: LinkCounts,
    pub gap: GapCounts,
    pub by_year_species: YearSpeciesCounts,
}

impl StudyAggregates {
    /// One pass over the rows per shape.
    pub fn build(records: &[Record]) -> Self {
        StudyAggregates {
            links: species_chemical_counts(records),
            gap: species_endpoint_year_counts(records),
            by_year_species: year_species_counts(records),
        }
    }
}

/// Species × chemical study counts. Rows with a sentinel species or chemical
/// are skipped: the network only links known pairs.
pub fn species_chemical_counts(records: &[Record]) -> LinkCounts {
    let mut counts = LinkCounts::new();
    for r in records {
        if !r.has_known_species() || !r.has_known_chemical() {
            continue;
        }
        *counts
            .entry((r.species.clone(), r.chemical.clone()))
            .or_insert(0) += 1;
    }
    counts
}

/// Species → endpoint → year counts for the gap heatmap.
pub fn species_endpoint_year_counts(records: &[Record]) -> GapCounts {
    let mut counts = GapCounts::new();
    for r in records {
        *counts
            .entry(r.species.clone())
            .or_default()
            .entry(r.endpoint.clone())
            .or_default()
            .entry(r.year)
            .or_insert(0) += 1;
    }
    counts
}

/// Year → species counts for the streamgraph.
pub fn year_species_counts(records: &[Record]) -> YearSpeciesCounts {
    let mut counts = YearSpeciesCounts::new();
    for r in records {
        *counts
            .entry(r.year)
            .or_default()
            .entry(r.species.clone())
            .or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Word-cloud selection
// ---------------------------------------------------------------------------

/// A merged word-cloud entry: the word, its best weight across topics, and
/// the topic that contributed that weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudWord {
    pub word: String,
    pub weight: f64,
    pub topic: String,
}

/// Top `n` words of one topic-year cell by descending weight. The sort is
/// stable: equal weights keep their original order.
pub fn top_words(entries: &[WordWeight], n: usize) -> Vec<WordWeight> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    sorted.truncate(n);
    sorted
}

/// Merge the per-topic top-`per_topic` lists for one year. A word appearing
/// under several topics keeps the occurrence with the strictly higher weight;
/// output order is first-encountered across topics in numeric id order.
pub fn merged_words_for_year(data: &TopicData, year: i32, per_topic: usize) -> Vec<CloudWord> {
    let mut merged: Vec<CloudWord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for topic in data.topic_ids() {
        for ww in top_words(data.words_for(&topic, year), per_topic) {
            match index.get(&ww.word) {
                Some(&i) => {
                    if ww.weight > merged[i].weight {
                        merged[i].weight = ww.weight;
                        merged[i].topic = topic.clone();
                    }
                }
                None => {
                    index.insert(ww.word.clone(), merged.len());
                    merged.push(CloudWord {
                        word: ww.word,
                        weight: ww.weight,
                        topic: topic.clone(),
                    });
                }
            }
        }
    }
    merged
}
