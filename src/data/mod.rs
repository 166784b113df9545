//! Data layer: core types, loading, aggregation, and filtering.
//!
//! Architecture:
//! ```text
//!  data.csv / topic_year_data.json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + normalize → StudyDataset / TopicData
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │ StudyAggregates│  tuple-keyed counts, built once per load
//!   └───────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply FilterSelection → filtered entities
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
