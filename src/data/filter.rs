use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::aggregate::{GapCounts, LinkCounts, YearSpeciesCounts};
use super::model::StudyDataset;

// ---------------------------------------------------------------------------
// FilterSelection – the user's current choices
// ---------------------------------------------------------------------------

/// The active value subsets and ranges chosen in the UI. Single writer: the
/// interaction handlers in [`crate::state::DashState`] mutate it; every
/// filter pass reads a snapshot and holds no state of its own between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    /// Selected species values (subset of the dataset's species set).
    pub species: BTreeSet<String>,
    /// Selected chemical values.
    pub chemicals: BTreeSet<String>,
    /// Inclusive [start, end] year range. An inverted range is not an
    /// error: it simply contributes zero counts.
    pub year_range: (i32, i32),
    /// Raw comma-separated sustainability keyword input.
    pub keywords: String,
    /// When set, only keyword-matching endpoints are kept.
    pub sustain_only: bool,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            species: BTreeSet::new(),
            chemicals: BTreeSet::new(),
            year_range: (0, 0),
            keywords: String::new(),
            sustain_only: false,
        }
    }
}

impl FilterSelection {
    /// Everything selected, matching the initial UI state after a load.
    pub fn select_all(dataset: &StudyDataset) -> Self {
        Self {
            species: dataset.species.clone(),
            chemicals: dataset.chemicals.clone(),
            year_range: dataset.year_span.unwrap_or((0, 0)),
            keywords: String::new(),
            sustain_only: false,
        }
    }

    /// Parse the keyword box: split on commas, trim, lowercase, drop empties.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// Case-insensitive substring test of `endpoint` against the parsed keyword
/// list. An empty list matches nothing.
pub fn matches_keywords(endpoint: &str, keywords: &[String]) -> bool {
    let lower = endpoint.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

// ---------------------------------------------------------------------------
// Filtered entities
// ---------------------------------------------------------------------------

/// One species–chemical edge of the network graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChemicalLink {
    pub species: String,
    pub chemical: String,
    pub studies: u64,
}

/// One cell of the gap heatmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapCell {
    pub species: String,
    pub endpoint: String,
    pub count: u64,
    pub is_sustainable: bool,
}

/// Per-species totals over a year range (streamgraph drill-down).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCount {
    pub species: String,
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Filter passes – total recomputation, no incremental state
// ---------------------------------------------------------------------------

/// Network edges restricted to the selected species and chemical subsets.
/// An edge is kept only when both of its endpoints are selected.
pub fn filter_chemical_links(links: &LinkCounts, selection: &FilterSelection) -> Vec<ChemicalLink> {
    links
        .iter()
        .filter(|((species, chemical), _)| {
            selection.species.contains(species) && selection.chemicals.contains(chemical)
        })
        .map(|((species, chemical), &studies)| ChemicalLink {
            species: species.clone(),
            chemical: chemical.clone(),
            studies,
        })
        .collect()
}

/// Gap heatmap cells: every species × endpoint combination of the full
/// dimension sets, counts summed over the selection's inclusive year range.
///
/// With `sustain_only` set, non-matching endpoints are dropped entirely; an
/// empty keyword list then yields an empty set, since nothing matches.
pub fn gap_cells(
    dataset: &StudyDataset,
    counts: &GapCounts,
    selection: &FilterSelection,
) -> Vec<GapCell> {
    let keywords = selection.keyword_list();
    let (start, end) = selection.year_range;
    let mut cells = Vec::new();

    for species in &dataset.species {
        for endpoint in &dataset.endpoints {
            let is_sustainable = matches_keywords(endpoint, &keywords);
            if selection.sustain_only && !is_sustainable {
                continue;
            }
            let count = counts
                .get(species)
                .and_then(|by_endpoint| by_endpoint.get(endpoint))
                .map(|by_year| sum_year_range(by_year, start, end))
                .unwrap_or(0);
            cells.push(GapCell {
                species: species.clone(),
                endpoint: endpoint.clone(),
                count,
                is_sustainable,
            });
        }
    }
    cells
}

/// Per-species totals over the selection's year range, one entity per
/// selected species. Species with no matching rows (or an inverted range)
/// appear with a count of zero.
pub fn species_totals(
    counts: &YearSpeciesCounts,
    selection: &FilterSelection,
) -> Vec<SpeciesCount> {
    let mut totals: BTreeMap<&String, u64> =
        selection.species.iter().map(|s| (s, 0)).collect();
    let (start, end) = selection.year_range;
    if start <= end {
        for (_, by_species) in counts.range(start..=end) {
            for (species, c) in by_species {
                if let Some(total) = totals.get_mut(species) {
                    *total += c;
                }
            }
        }
    }
    totals
        .into_iter()
        .map(|(species, count)| SpeciesCount {
            species: species.clone(),
            count,
        })
        .collect()
}

// BTreeMap::range panics on an inverted range, so guard here.
fn sum_year_range(by_year: &BTreeMap<i32, u64>, start: i32, end: i32) -> u64 {
    if start > end {
        return 0;
    }
    by_year.range(start..=end).map(|(_, c)| c).sum()
}
