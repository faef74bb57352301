//! Static campus map: named places plus a fixed pairwise distance table.
//!
//! Distances are Euclidean distances measured on the campus map, stored as literal
//! values. The three nearest neighbours of every place are computed once when the
//! store is built.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

const LOCATION_COUNT: usize = 14;

/// How many neighbours are cached per location.
pub const NEARBY_CACHE_SIZE: usize = 3;

const LOCATION_NAMES: [&str; LOCATION_COUNT] = [
    "Administration Block",
    "Auditorium",
    "Students Affairs/Admissions",
    "Central Library",
    "Basket Ball Courts",
    "Volleyball Court",
    "Cafeteria",
    "View Tube",
    "Boys Hostel",
    "Green Forest",
    "Rain Water Harvested Lake",
    "Water Treatment Plant",
    "Two Wheeler Parking",
    "Car Parking",
];

#[rustfmt::skip]
const DISTANCES: [[f64; LOCATION_COUNT]; LOCATION_COUNT] = [
    [0.0, 72.80, 70.71, 241.30, 137.57, 20.62, 311.33, 301.54, 539.00, 531.15, 379.64, 241.30, 119.27, 221.42],
    [72.80, 0.0, 140.36, 311.33, 210.30, 93.41, 382.39, 369.09, 607.47, 602.52, 444.78, 293.47, 90.14, 150.08],
    [70.71, 140.36, 0.0, 194.74, 81.39, 52.20, 259.28, 260.05, 491.76, 462.20, 309.23, 180.35, 185.81, 290.39],
    [241.30, 311.33, 194.74, 0.0, 114.02, 222.04, 72.80, 67.08, 298.33, 344.82, 278.03, 270.00, 308.06, 449.44],
    [137.57, 210.30, 81.39, 114.02, 0.0, 117.05, 178.04, 180.28, 410.37, 400.12, 272.95, 193.13, 230.87, 356.93],
    [20.62, 93.41, 52.20, 222.04, 117.05, 0.0, 291.55, 283.20, 520.10, 510.88, 361.39, 228.04, 134.16, 241.87],
    [311.33, 382.39, 259.28, 72.80, 178.04, 291.55, 0.0, 56.57, 233.45, 286.36, 260.00, 298.33, 380.79, 522.02],
    [301.54, 369.09, 260.05, 67.08, 180.28, 283.20, 56.57, 0.0, 238.54, 340.00, 313.05, 331.36, 354.68, 500.90],
    [539.00, 607.47, 491.76, 298.33, 410.37, 520.10, 233.45, 238.54, 0.0, 306.76, 414.37, 514.30, 590.34, 738.24],
    [531.15, 602.52, 462.20, 344.82, 400.12, 510.88, 286.36, 340.00, 306.76, 0.0, 200.00, 371.21, 630.71, 752.40],
    [379.64, 444.78, 309.23, 278.03, 272.95, 361.39, 260.00, 313.05, 414.37, 200.00, 0.0, 177.20, 493.36, 593.04],
    [241.30, 293.47, 180.35, 270.00, 193.13, 228.04, 298.33, 331.36, 514.30, 371.21, 177.20, 0.0, 360.56, 434.17],
    [119.27, 90.14, 185.81, 308.06, 230.87, 134.16, 380.79, 354.68, 590.34, 630.71, 493.36, 360.56, 0.0, 150.00],
    [221.42, 150.08, 290.39, 449.44, 356.93, 241.87, 522.02, 500.90, 738.24, 752.40, 593.04, 434.17, 150.00, 0.0],
];

/// A named place on the campus map. IDs start at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusLocation {
    pub id: u32,
    pub name: String,
}

/// A neighbouring place and its distance from the anchor location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyLocation {
    pub location: CampusLocation,
    pub distance: f64,
}

/// Read-only store of campus places and their pairwise distances.
#[derive(Debug, Clone)]
pub struct LocationStore {
    locations: Vec<CampusLocation>,
    /// Nearest neighbours per location, same index as `locations`.
    nearby: Vec<Vec<NearbyLocation>>,
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationStore {
    pub fn new() -> Self {
        let locations: Vec<CampusLocation> = LOCATION_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| CampusLocation {
                id: (i + 1) as u32,
                name: name.to_string(),
            })
            .collect();

        let nearby = (0..LOCATION_COUNT)
            .map(|from| nearest_neighbours(&locations, from))
            .collect();

        debug!("Campus location store ready with {} places", locations.len());
        Self { locations, nearby }
    }

    /// All places, in map order.
    pub fn locations(&self) -> &[CampusLocation] {
        &self.locations
    }

    /// First place whose name contains `query`, ignoring case.
    pub fn location_by_name(&self, query: &str) -> Option<&CampusLocation> {
        self.index_by_name(query).map(|i| &self.locations[i])
    }

    pub fn location_by_id(&self, id: u32) -> Option<&CampusLocation> {
        self.locations.iter().find(|loc| loc.id == id)
    }

    /// Cached nearest places for the location named exactly `name`.
    ///
    /// Returns at most `limit` entries (capped by [`NEARBY_CACHE_SIZE`]), closest first.
    /// Distances are zeroed unless `include_distances` is set. Unknown names give an
    /// empty list.
    pub fn nearby_locations(
        &self,
        name: &str,
        limit: usize,
        include_distances: bool,
    ) -> Vec<NearbyLocation> {
        let Some(index) = self.locations.iter().position(|loc| loc.name == name) else {
            return Vec::new();
        };

        self.nearby[index]
            .iter()
            .take(limit)
            .map(|entry| NearbyLocation {
                location: entry.location.clone(),
                distance: if include_distances { entry.distance } else { 0.0 },
            })
            .collect()
    }

    /// Distance between two places resolved by name, `None` if either is unknown.
    pub fn distance(&self, from: &str, to: &str) -> Option<f64> {
        let a = self.index_by_name(from)?;
        let b = self.index_by_name(to)?;
        Some(DISTANCES[a][b])
    }

    /// Every other place ordered by ascending distance from `name` (exact match).
    pub fn ranked_from(&self, name: &str) -> Vec<NearbyLocation> {
        match self.locations.iter().position(|loc| loc.name == name) {
            Some(index) => ranked(&self.locations, index),
            None => Vec::new(),
        }
    }

    fn index_by_name(&self, query: &str) -> Option<usize> {
        let needle = query.to_lowercase();
        self.locations
            .iter()
            .position(|loc| loc.name.to_lowercase().contains(&needle))
    }
}

fn ranked(locations: &[CampusLocation], from: usize) -> Vec<NearbyLocation> {
    let mut others: Vec<NearbyLocation> = locations
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != from)
        .map(|(i, loc)| NearbyLocation {
            location: loc.clone(),
            distance: DISTANCES[from][i],
        })
        .collect();
    // sort_by is stable: ties keep map order
    others.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    others
}

fn nearest_neighbours(locations: &[CampusLocation], from: usize) -> Vec<NearbyLocation> {
    let mut nearest = ranked(locations, from);
    nearest.truncate(NEARBY_CACHE_SIZE);
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[NearbyLocation]) -> Vec<&str> {
        list.iter().map(|n| n.location.name.as_str()).collect()
    }

    #[test]
    fn test_distance_table_is_symmetric_with_zero_diagonal() {
        for a in 0..LOCATION_COUNT {
            assert_eq!(DISTANCES[a][a], 0.0);
            for b in 0..LOCATION_COUNT {
                assert_eq!(DISTANCES[a][b], DISTANCES[b][a], "{} / {}", a, b);
            }
        }
    }

    #[test]
    fn test_distance_is_symmetric_by_name() {
        let store = LocationStore::new();
        for a in store.locations() {
            for b in store.locations() {
                assert_eq!(store.distance(&a.name, &b.name), store.distance(&b.name, &a.name));
            }
        }
    }

    #[test]
    fn test_library_lookup_and_neighbours() {
        let store = LocationStore::new();
        let library = store.location_by_name("library").unwrap();
        assert_eq!(library.name, "Central Library");
        assert_eq!(library.id, 4);

        let nearby = store.nearby_locations(&library.name, 3, true);
        assert_eq!(names(&nearby), vec!["View Tube", "Cafeteria", "Basket Ball Courts"]);
        assert_eq!(nearby[0].distance, 67.08);
    }

    #[test]
    fn test_nearby_never_contains_anchor_and_is_sorted() {
        let store = LocationStore::new();
        for loc in store.locations() {
            let nearby = store.nearby_locations(&loc.name, 3, true);
            assert_eq!(nearby.len(), 3);
            assert!(nearby.iter().all(|n| n.location.name != loc.name));
            assert!(nearby.windows(2).all(|w| w[0].distance <= w[1].distance));
        }
    }

    #[test]
    fn test_nearby_without_distances_zeroes_them() {
        let store = LocationStore::new();
        let nearby = store.nearby_locations("Administration Block", 2, false);
        assert_eq!(names(&nearby), vec!["Volleyball Court", "Students Affairs/Admissions"]);
        assert!(nearby.iter().all(|n| n.distance == 0.0));
    }

    #[test]
    fn test_nearby_requires_exact_name() {
        let store = LocationStore::new();
        assert!(store.nearby_locations("library", 3, true).is_empty());
        assert!(store.nearby_locations("Narnia", 3, true).is_empty());
    }

    #[test]
    fn test_substring_match_takes_first_in_map_order() {
        let store = LocationStore::new();
        // Both parking lots match; the two wheeler lot comes first
        assert_eq!(store.location_by_name("PARKING").unwrap().name, "Two Wheeler Parking");
        assert!(store.location_by_name("stadium").is_none());
        assert_eq!(store.location_by_id(14).unwrap().name, "Car Parking");
        assert!(store.location_by_id(0).is_none());
    }

    #[test]
    fn test_distance_unknown_location() {
        let store = LocationStore::new();
        assert_eq!(store.distance("cafeteria", "view tube"), Some(56.57));
        assert_eq!(store.distance("cafeteria", "moon"), None);
    }

    #[test]
    fn test_ranked_from_lists_every_other_place() {
        let store = LocationStore::new();
        let ranked = store.ranked_from("Boys Hostel");
        assert_eq!(ranked.len(), LOCATION_COUNT - 1);
        assert_eq!(ranked.last().unwrap().location.name, "Car Parking");
    }
}
