//! Test Module
//!
//! Scenario tests for the campus assistant core.
//!
//! ## Test Categories
//! - `brain_tests`: Keyword classification, extracted fields, direct command parsing
//! - `navigation_tests`: Campus navigation answers and proximity wording
//! - `database_tests`: Mock student data source through the trait object
//! - `assistant_tests`: Router decisions with a scripted language model
//! - `integration_tests`: Full routing against a mocked Gemini endpoint

pub mod database_tests;
pub mod integration_tests;
