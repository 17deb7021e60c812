//! smellscore-core — Document splitting, scoring, and report building.
//!
//! This crate defines the data model, the provider trait, and the scoring
//! pipeline that turns a document and a checklist into a scored report.

pub mod client;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod report;
pub mod splitter;
pub mod traits;
