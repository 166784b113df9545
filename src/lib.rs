//! ecoviz – aggregation and filtering core for an ecotoxicology dashboard.
//!
//! The pipeline: load CSV/JSON into immutable datasets, build tuple-keyed
//! aggregates once per load, re-apply the user's [`FilterSelection`] on
//! every interaction, and hand `{entities, scale domains, colors}` bundles
//! to the rendering collaborator. All drawing and layout live outside this
//! crate.
//!
//! [`FilterSelection`]: data::filter::FilterSelection

pub mod color;
pub mod data;
pub mod scale;
pub mod schedule;
pub mod state;
pub mod view;
