//! # Brain Module
//!
//! Fast, non-LLM analysis of student questions. Runs BEFORE any data lookup or model
//! call to decide where the answer comes from.
//!
//! ## Components
//! - `classifier`: keyword scoring, category selection, field extraction
//! - `commands`: `!` direct command parsing and place-name aliases

pub mod classifier;
pub mod commands;

pub use classifier::{
    weekday_name, Category, ClassificationResult, DayFilter, ExtractedInfo, LocationQueryKind,
    QueryClassifier, QueryType,
};
