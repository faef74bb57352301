//! # Campus Module
//!
//! Static campus map and the navigation answers built on it.
//!
//! ## Components
//! - `locations`: named places, distance table, nearest-neighbour cache
//! - `navigation`: pattern-driven answers to "where is" / "how far" questions

pub mod locations;
pub mod navigation;

pub use locations::{CampusLocation, LocationStore, NearbyLocation};
