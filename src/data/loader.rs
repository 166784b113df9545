use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::{
    Record, StudyDataset, TopicData, UNKNOWN_CHEMICAL, UNKNOWN_ENDPOINT, UNKNOWN_SPECIES,
};

// ---------------------------------------------------------------------------
// Schema resolution
// ---------------------------------------------------------------------------

/// Errors resolving the study CSV schema.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: '{value}' is not a valid year")]
    BadYear { row: usize, value: String },
}

// The exports spell these columns inconsistently; resolve once at load time
// instead of falling through aliases on every access.
const YEAR_ALIASES: &[&str] = &["document_year"];
const SPECIES_ALIASES: &[&str] = &["species_category", "species"];
const CHEMICAL_ALIASES: &[&str] = &["Chemical", "chemical", "CHEMICAL"];
const ENDPOINT_ALIASES: &[&str] = &["Exposure Endpoint Type"];

fn resolve_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

// ---------------------------------------------------------------------------
// Study CSV
// ---------------------------------------------------------------------------

/// Load the study corpus from a CSV file.
pub fn load_study_csv(path: &Path) -> Result<StudyDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    parse_study_csv(file)
}

/// Parse the study corpus from any reader.
///
/// Required columns: `document_year` and a species column. Chemical and
/// endpoint columns are optional; absent columns (or empty cells) get the
/// `Unknown …` sentinel so they can still be grouped and filtered.
pub fn parse_study_csv<R: Read>(input: R) -> Result<StudyDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let year_idx =
        resolve_column(&headers, YEAR_ALIASES).ok_or(LoadError::MissingColumn("document_year"))?;
    let species_idx = resolve_column(&headers, SPECIES_ALIASES)
        .ok_or(LoadError::MissingColumn("species_category"))?;
    let chemical_idx = resolve_column(&headers, CHEMICAL_ALIASES);
    let endpoint_idx = resolve_column(&headers, ENDPOINT_ALIASES);

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let raw_year = row.get(year_idx).unwrap_or("").trim();
        let year: i32 = raw_year.parse().map_err(|_| LoadError::BadYear {
            row: row_no,
            value: raw_year.to_string(),
        })?;

        records.push(Record {
            year,
            species: categorical(row.get(species_idx), UNKNOWN_SPECIES),
            chemical: categorical(chemical_idx.and_then(|i| row.get(i)), UNKNOWN_CHEMICAL),
            endpoint: categorical(endpoint_idx.and_then(|i| row.get(i)), UNKNOWN_ENDPOINT),
        });
    }

    Ok(StudyDataset::from_records(records))
}

fn categorical(cell: Option<&str>, sentinel: &str) -> String {
    match cell.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => sentinel.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Topic-year JSON
// ---------------------------------------------------------------------------

/// Load the topic-model word weights from a JSON file.
pub fn load_topic_json(path: &Path) -> Result<TopicData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_topic_json(&text)
}

/// Parse the topic-year document: `{ years: [...], topics: {...} }`.
pub fn parse_topic_json(text: &str) -> Result<TopicData> {
    serde_json::from_str(text).context("parsing topic JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_chemical_column_aliases() {
        for header in ["Chemical", "chemical", "CHEMICAL"] {
            let csv = format!("document_year,species_category,{header}\n1950,Fish,Mercury\n");
            let ds = parse_study_csv(csv.as_bytes()).unwrap();
            assert_eq!(ds.records[0].chemical, "Mercury");
        }
    }

    #[test]
    fn sentinel_fills_missing_fields() {
        let csv = "document_year,species_category\n1950,Fish\n1951,\n";
        let ds = parse_study_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].chemical, UNKNOWN_CHEMICAL);
        assert_eq!(ds.records[0].endpoint, UNKNOWN_ENDPOINT);
        assert_eq!(ds.records[1].species, UNKNOWN_SPECIES);
    }

    #[test]
    fn missing_year_column_is_an_error() {
        let err = parse_study_csv("species_category\nFish\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("document_year"));
    }

    #[test]
    fn non_numeric_year_is_an_error() {
        let err =
            parse_study_csv("document_year,species_category\nn/a,Fish\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("not a valid year"));
    }

    #[test]
    fn parses_topic_document() {
        let json = r#"{
            "years": [1990, 1991],
            "topics": {
                "0": { "1990": [{ "word": "mercury", "weight": 2.5 }] },
                "1": { "1991": [] }
            }
        }"#;
        let data = parse_topic_json(json).unwrap();
        assert_eq!(data.sorted_years(), vec![1990, 1991]);
        assert_eq!(data.words_for("0", 1990).len(), 1);
        assert!(data.words_for("0", 1991).is_empty());
    }
}
