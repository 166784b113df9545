use std::path::Path;
use std::time::{Duration, Instant};

use crate::color::ColorMap;
use crate::data::aggregate::StudyAggregates;
use crate::data::filter::{self, FilterSelection};
use crate::data::loader;
use crate::data::model::{StudyDataset, TopicData};
use crate::schedule::{Debouncer, Ticker};
use crate::view::{self, CloudView, GapView, NetworkView, StreamView};

/// Quiet window for slider-driven recomputation.
pub const SLIDER_DEBOUNCE: Duration = Duration::from_millis(100);
/// Auto-advance period of the word-cloud play mode.
pub const PLAY_PERIOD: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Single writer: UI event handlers call the mutators below; the rendering
/// collaborator only reads the view bundles. Loading happens up front and
/// the loaded data is immutable, so every recomputation is a pure pass over
/// the cached aggregates.
pub struct DashState {
    /// Loaded study corpus (None until a file loads, or after a failed load).
    pub dataset: Option<StudyDataset>,
    /// Tuple-keyed counts, rebuilt once per dataset load.
    pub aggregates: StudyAggregates,
    /// Topic-model word weights for the word cloud.
    pub topic_data: Option<TopicData>,

    /// Current filter choices.
    pub selection: FilterSelection,

    /// Species → colour, assigned from the full species set at load time.
    pub species_colors: Option<ColorMap>,
    /// Topic → colour.
    pub topic_colors: Option<ColorMap>,

    /// Word-cloud slider position (index into the sorted year list).
    pub year_index: usize,
    slider_debounce: Debouncer,
    play_timer: Ticker,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for DashState {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl DashState {
    pub fn new(now: Instant) -> Self {
        Self {
            dataset: None,
            aggregates: StudyAggregates::default(),
            topic_data: None,
            selection: FilterSelection::default(),
            species_colors: None,
            topic_colors: None,
            year_index: 0,
            slider_debounce: Debouncer::new(SLIDER_DEBOUNCE),
            play_timer: Ticker::new(PLAY_PERIOD, now),
            status_message: None,
        }
    }

    // -- Loading ------------------------------------------------------------

    /// Load the study CSV. A failed load reports and falls back to the
    /// empty state; the dashboard never crashes on bad input.
    pub fn load_study_file(&mut self, path: &Path) {
        match loader::load_study_csv(path) {
            Ok(dataset) => {
                log::info!(
                    "loaded {} study rows from {}",
                    dataset.len(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load study data: {e:#}");
                self.status_message = Some(format!("Data unavailable: {e}"));
                self.dataset = None;
                self.aggregates = StudyAggregates::default();
                self.selection = FilterSelection::default();
                self.species_colors = None;
            }
        }
    }

    /// Ingest a loaded dataset: build aggregates, select everything,
    /// assign colours from the full species set.
    pub fn set_dataset(&mut self, dataset: StudyDataset) {
        self.aggregates = StudyAggregates::build(&dataset.records);
        self.selection = FilterSelection::select_all(&dataset);
        self.species_colors = Some(ColorMap::new("species", dataset.species.iter().cloned()));
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Load the topic-year JSON for the word cloud.
    pub fn load_topic_file(&mut self, path: &Path) {
        match loader::load_topic_json(path) {
            Ok(data) => {
                log::info!(
                    "loaded {} topics over {} years from {}",
                    data.topics.len(),
                    data.years.len(),
                    path.display()
                );
                self.set_topic_data(data);
            }
            Err(e) => {
                log::error!("failed to load topic data: {e:#}");
                self.status_message = Some(format!("Data unavailable: {e}"));
                self.topic_data = None;
                self.topic_colors = None;
            }
        }
    }

    pub fn set_topic_data(&mut self, data: TopicData) {
        self.topic_colors = Some(ColorMap::new("topic", data.topic_ids()));
        self.year_index = 0;
        self.topic_data = Some(data);
    }

    // -- Selection mutators (the UI event handlers) -------------------------

    pub fn toggle_species(&mut self, species: &str) {
        toggle(&mut self.selection.species, species);
    }

    pub fn toggle_chemical(&mut self, chemical: &str) {
        toggle(&mut self.selection.chemicals, chemical);
    }

    /// Re-select every species (the "Select all" button).
    pub fn select_all_species(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.species = ds.species.clone();
        }
    }

    pub fn select_no_species(&mut self) {
        self.selection.species.clear();
    }

    pub fn select_all_chemicals(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.chemicals = ds.chemicals.clone();
        }
    }

    pub fn select_no_chemicals(&mut self) {
        self.selection.chemicals.clear();
    }

    pub fn set_year_range(&mut self, start: i32, end: i32) {
        self.selection.year_range = (start, end);
    }

    pub fn set_keywords(&mut self, keywords: String) {
        self.selection.keywords = keywords;
    }

    pub fn set_sustain_only(&mut self, on: bool) {
        self.selection.sustain_only = on;
    }

    // -- Word-cloud playback ------------------------------------------------

    /// Slider drag: move the year index and debounce the redraw.
    pub fn slider_moved(&mut self, index: usize, now: Instant) {
        self.year_index = index;
        self.slider_debounce.trigger(now);
    }

    /// Play/pause button. Clears any pending debounce so a toggle never
    /// leaves a stale recomputation behind.
    pub fn toggle_playback(&mut self, now: Instant) {
        if self.play_timer.is_running() {
            self.play_timer.stop();
        } else {
            self.play_timer.start(now);
        }
        self.slider_debounce.cancel();
    }

    pub fn is_playing(&self) -> bool {
        self.play_timer.is_running()
    }

    /// Advance timers; true when the word cloud should be redrawn. While
    /// playing, each tick advances the year index modulo the year count and
    /// supersedes any pending debounce.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.play_timer.fire(now) {
            let year_count = self
                .topic_data
                .as_ref()
                .map(|d| d.years.len())
                .unwrap_or(0);
            if year_count > 0 {
                self.year_index = (self.year_index + 1) % year_count;
            }
            self.slider_debounce.cancel();
            return true;
        }
        self.slider_debounce.fire(now)
    }

    // -- Views (the rendering-collaborator interface) -----------------------

    /// Streamgraph bundle; None until a dataset is loaded.
    pub fn stream_view(&self) -> Option<StreamView> {
        let colors = self.species_colors.as_ref()?;
        Some(view::stream_view(&self.aggregates.by_year_species, colors))
    }

    /// Word-cloud bundle for the current year index.
    pub fn cloud_view(&self) -> Option<CloudView> {
        let data = self.topic_data.as_ref()?;
        let colors = self.topic_colors.as_ref()?;
        Some(view::cloud_view(data, self.year_index, colors))
    }

    /// Force-network bundle for the current selection.
    pub fn network_view(&self) -> Option<NetworkView> {
        self.dataset.as_ref()?;
        let links = filter::filter_chemical_links(&self.aggregates.links, &self.selection);
        Some(view::network_view(links))
    }

    /// Gap-heatmap bundle for the current selection.
    pub fn gap_view(&self) -> Option<GapView> {
        let dataset = self.dataset.as_ref()?;
        Some(view::gap_view(dataset, &self.aggregates.gap, &self.selection))
    }

    /// Chemical multi-select options: (raw filter value, display label).
    pub fn chemical_options(&self) -> Vec<(String, String)> {
        self.dataset
            .as_ref()
            .map(|ds| {
                ds.chemicals
                    .iter()
                    .map(|c| (c.clone(), view::title_case(c)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn toggle(selected: &mut std::collections::BTreeSet<String>, value: &str) {
    if !selected.remove(value) {
        selected.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_study_csv;
    use crate::data::loader::parse_topic_json;

    const MS: Duration = Duration::from_millis(1);

    fn study_state() -> DashState {
        let csv = "\
document_year,species_category,Chemical,Exposure Endpoint Type
1950,Fish,Mercury,Mortality
1950,Bird,Mercury,Growth
1951,Fish,Lead,Mortality
";
        let mut state = DashState::new(Instant::now());
        state.set_dataset(parse_study_csv(csv.as_bytes()).unwrap());
        state
    }

    fn topic_state() -> DashState {
        let json = r#"{
            "years": [1990, 1991, 1992],
            "topics": { "0": { "1990": [{ "word": "mercury", "weight": 2.0 }] } }
        }"#;
        let mut state = DashState::new(Instant::now());
        state.set_topic_data(parse_topic_json(json).unwrap());
        state
    }

    #[test]
    fn load_failure_falls_back_to_empty_state() {
        let mut state = study_state();
        state.load_study_file(Path::new("/nonexistent/data.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
        assert!(state.network_view().is_none());
        assert!(state.gap_view().is_none());
    }

    #[test]
    fn fresh_load_selects_everything() {
        let state = study_state();
        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(state.selection.species, ds.species);
        assert_eq!(state.selection.chemicals, ds.chemicals);
        assert_eq!(state.selection.year_range, (1950, 1951));
    }

    #[test]
    fn toggling_species_narrows_the_network() {
        let mut state = study_state();
        state.toggle_species("Bird");
        let view = state.network_view().unwrap();
        assert!(view.links.iter().all(|l| l.species == "Fish"));
        state.toggle_species("Bird");
        assert_eq!(state.network_view().unwrap().links.len(), 3);
    }

    #[test]
    fn deselecting_everything_empties_the_network() {
        let mut state = study_state();
        state.select_no_species();
        let view = state.network_view().unwrap();
        assert!(view.links.is_empty());
        assert!(view.nodes.is_empty());
    }

    #[test]
    fn species_color_survives_filter_changes() {
        let mut state = study_state();
        let before = state.species_colors.as_ref().unwrap().color_for("Fish");
        state.toggle_species("Bird");
        state.toggle_species("Fish");
        let after = state.species_colors.as_ref().unwrap().color_for("Fish");
        assert_eq!(before, after);
    }

    #[test]
    fn play_tick_advances_and_wraps() {
        let t0 = Instant::now();
        let mut state = topic_state();
        state.toggle_playback(t0);
        assert!(state.is_playing());

        for (seconds, expected) in [(1u32, 1), (2, 2), (3, 0)] {
            assert!(state.tick(t0 + seconds * 1000 * MS));
            assert_eq!(state.year_index, expected);
        }
    }

    #[test]
    fn tick_is_noop_while_paused() {
        let t0 = Instant::now();
        let mut state = topic_state();
        assert!(!state.tick(t0 + 5000 * MS));
        assert_eq!(state.year_index, 0);
    }

    #[test]
    fn playback_toggle_clears_pending_debounce() {
        let t0 = Instant::now();
        let mut state = topic_state();
        state.slider_moved(1, t0);
        state.toggle_playback(t0 + 10 * MS);
        state.toggle_playback(t0 + 20 * MS);
        // the debounce window has elapsed but the toggle cancelled it
        assert!(!state.tick(t0 + 500 * MS));
    }

    #[test]
    fn slider_debounce_fires_once_after_quiet_window() {
        let t0 = Instant::now();
        let mut state = topic_state();
        state.slider_moved(1, t0);
        state.slider_moved(2, t0 + 50 * MS);
        assert!(!state.tick(t0 + 120 * MS));
        assert!(state.tick(t0 + 150 * MS));
        assert!(!state.tick(t0 + 300 * MS));
        assert_eq!(state.year_index, 2);
    }

    #[test]
    fn chemical_options_format_labels_only() {
        let csv = "document_year,species_category,Chemical\n1950,Fish,COPPER SULFATE\n";
        let mut state = DashState::new(Instant::now());
        state.set_dataset(parse_study_csv(csv.as_bytes()).unwrap());
        assert_eq!(
            state.chemical_options(),
            vec![("COPPER SULFATE".to_string(), "Copper Sulfate".to_string())]
        );
    }
}
