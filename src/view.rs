//! View assembly: the bundles handed to the rendering collaborator.
//!
//! Each view is a plain `{ entities, scale domains, colors }` value rebuilt
//! in full on every filter or aggregate change. Drawing, animation, and
//! layout are the collaborator's problem; nothing here touches a canvas.

use std::collections::BTreeSet;

use crate::color::{Color, ColorMap};
use crate::data::aggregate::{self, CloudWord, GapCounts, YearSpeciesCounts};
use crate::data::filter::{self, ChemicalLink, FilterSelection, GapCell};
use crate::data::model::{StudyDataset, TopicData, FIRST_TRACKED_YEAR};
use crate::scale::{self, Domain};

/// Words drawn per topic per year before merging.
pub const TOP_WORDS_PER_TOPIC: usize = 5;

// ---------------------------------------------------------------------------
// Streamgraph
// ---------------------------------------------------------------------------

/// One dense streamgraph row: counts aligned with [`StreamView::species`],
/// zero-filled where a species has no studies that year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRow {
    pub year: i32,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct StreamView {
    /// Stable layer order (sorted species names).
    pub species: Vec<String>,
    /// Rows in ascending year order, starting at [`FIRST_TRACKED_YEAR`].
    pub rows: Vec<StreamRow>,
    pub year_domain: Domain,
    /// Legend: species → layer colour.
    pub legend: Vec<(String, Color)>,
}

/// Dense year × species table for the streamgraph. Years before
/// [`FIRST_TRACKED_YEAR`] are dropped.
pub fn stream_view(counts: &YearSpeciesCounts, colors: &ColorMap) -> StreamView {
    let species: Vec<String> = counts
        .values()
        .flat_map(|by_species| by_species.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();

    let rows: Vec<StreamRow> = counts
        .range(FIRST_TRACKED_YEAR..)
        .map(|(&year, by_species)| StreamRow {
            year,
            counts: species
                .iter()
                .map(|s| by_species.get(s).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    let year_domain = match rows.last() {
        Some(row) => Domain {
            min: FIRST_TRACKED_YEAR as f64,
            max: row.year as f64,
        },
        None => Domain::default(),
    };

    let legend = species
        .iter()
        .map(|s| (s.clone(), colors.color_for(s)))
        .collect();

    StreamView {
        species,
        rows,
        year_domain,
        legend,
    }
}

// ---------------------------------------------------------------------------
// Word cloud
// ---------------------------------------------------------------------------

/// One word ready for layout: weight already projected to a font size and
/// topic resolved to its colour.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudWordView {
    pub word: String,
    pub topic: String,
    pub weight: f64,
    pub size: f64,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct CloudView {
    /// The displayed year, None when the document has no years at all.
    pub year: Option<i32>,
    pub words: Vec<CloudWordView>,
    pub size_domain: Domain,
    /// Topic legend; static across years, like the topic colours.
    pub legend: Vec<(String, Color)>,
}

/// Merged top-words view for the year at `year_index` into the sorted year
/// list. A year with no words yields an empty cloud, not an error.
pub fn cloud_view(data: &TopicData, year_index: usize, colors: &ColorMap) -> CloudView {
    let years = data.sorted_years();
    let year = match years.get(year_index) {
        Some(&y) => y,
        None => {
            return CloudView {
                year: None,
                words: Vec::new(),
                size_domain: Domain::default(),
                legend: colors.legend_entries(),
            }
        }
    };

    let merged = aggregate::merged_words_for_year(data, year, TOP_WORDS_PER_TOPIC);
    let size_domain = Domain::of(merged.iter().map(|w| w.weight));

    let words = merged
        .into_iter()
        .map(|CloudWord { word, weight, topic }| CloudWordView {
            size: scale::word_size(size_domain, weight),
            color: colors.color_for(&topic),
            word,
            weight,
            topic,
        })
        .collect();

    CloudView {
        year: Some(year),
        words,
        size_domain,
        legend: colors.legend_entries(),
    }
}

// ---------------------------------------------------------------------------
// Force network
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Species,
    Chemical,
}

/// One network node; `studies` is the sum over its incident links and
/// `radius` is already projected for the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub id: String,
    pub kind: NodeKind,
    pub studies: u64,
    pub radius: f64,
}

#[derive(Debug, Clone, Default)]
pub struct NetworkView {
    /// Nodes in first-encountered link order.
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<ChemicalLink>,
}

/// Build nodes from the filtered links: one node per distinct species and
/// chemical, magnitudes summed from incident edges.
pub fn network_view(links: Vec<ChemicalLink>) -> NetworkView {
    let mut nodes: Vec<NetworkNode> = Vec::new();
    let find = |nodes: &mut Vec<NetworkNode>, id: &str, kind: NodeKind| -> usize {
        match nodes.iter().position(|n| n.id == id) {
            Some(i) => i,
            None => {
                nodes.push(NetworkNode {
                    id: id.to_string(),
                    kind,
                    studies: 0,
                    radius: 0.0,
                });
                nodes.len() - 1
            }
        }
    };

    for link in &links {
        let si = find(&mut nodes, &link.species, NodeKind::Species);
        nodes[si].studies += link.studies;
        let ci = find(&mut nodes, &link.chemical, NodeKind::Chemical);
        nodes[ci].studies += link.studies;
    }

    let max_studies = nodes.iter().map(|n| n.studies).max().unwrap_or(0);
    for node in &mut nodes {
        node.radius = scale::node_radius(node.studies, max_studies);
    }

    NetworkView { nodes, links }
}

// ---------------------------------------------------------------------------
// Gap heatmap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct GapView {
    /// Row order: the full sorted species set.
    pub species: Vec<String>,
    /// Column order: endpoints as they first occur in the cell list.
    pub endpoints: Vec<String>,
    pub cells: Vec<GapCell>,
    /// Colour-ramp domain, `[0, max(count, 1)]`.
    pub count_domain: Domain,
}

/// Heatmap cells for the current selection plus the axis orders and colour
/// ramp the collaborator needs.
pub fn gap_view(
    dataset: &StudyDataset,
    counts: &GapCounts,
    selection: &FilterSelection,
) -> GapView {
    let cells = filter::gap_cells(dataset, counts, selection);

    let mut endpoints: Vec<String> = Vec::new();
    for cell in &cells {
        if !endpoints.contains(&cell.endpoint) {
            endpoints.push(cell.endpoint.clone());
        }
    }

    let count_domain = scale::count_domain(cells.iter().map(|c| c.count));

    GapView {
        species: dataset.species.iter().cloned().collect(),
        endpoints,
        cells,
        count_domain,
    }
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

/// Title-case a raw chemical value for display: `"COPPER SULFATE"` →
/// `"Copper Sulfate"`. Filter values keep the raw spelling; only labels are
/// formatted.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for ch in s.chars() {
        let is_word = ch.is_alphanumeric() || ch == '_';
        if at_boundary && is_word {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        at_boundary = !is_word;
    }
    out
}
