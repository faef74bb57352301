//! Free-text campus navigation answers built on the [`LocationStore`].

use super::locations::{LocationStore, NearbyLocation};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Words that mark a query as a navigation question.
pub const NAVIGATION_KEYWORDS: &[&str] = &[
    "campus",
    "map",
    "location",
    "where",
    "find",
    "nearby",
    "building",
    "library",
    "auditorium",
    "cafeteria",
    "hostel",
    "parking",
    "navigate",
    "direction",
    "how to reach",
    "how to get to",
];

const PROXIMITY_NOTE: &str = "Locations are listed in order of proximity based on Euclidean distance.";

static NEARBY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:near|nearby|close to|around)\s+(.+?)(?:\?|$)")
        .expect("Invalid regex: nearby pattern")
});

static WHERE_IS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:where is|find|locate|show me|tell me about|how to reach|how to get to|direction to)\s+(?:the\s+)?(.+?)(?:\?|$|\s+is|\s+located)")
        .expect("Invalid regex: where-is pattern")
});

static DISTANCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:distance|how far|far is|compare)\s+(?:from\s+)?(?:the\s+)?(.+?)\s+(?:to|and|from)\s+(?:the\s+)?(.+?)(?:\?|$)")
        .expect("Invalid regex: distance pattern")
});

static ANCHOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:from|to)\s+(?:the\s+)?(.+?)(?:\?|$|\s+is|\s+located)")
        .expect("Invalid regex: anchor pattern")
});

/// Returns `true` if the query mentions any navigation keyword.
pub fn is_navigation_query(query: &str) -> bool {
    let lower = query.to_lowercase();
    NAVIGATION_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Answers a navigation question, or `None` when no navigation pattern applies.
pub fn answer(store: &LocationStore, query: &str) -> Option<String> {
    let lower = query.to_lowercase();

    if lower.contains("nearby") || lower.contains("close to") {
        if let Some(name) = capture(&NEARBY_PATTERN, query, 1) {
            debug!("Navigation: nearby lookup for '{}'", name);
            return Some(nearby_answer(store, &name));
        }
    }

    if let Some(name) = capture(&WHERE_IS_PATTERN, query, 1) {
        debug!("Navigation: where-is lookup for '{}'", name);
        return Some(match store.location_by_name(&name) {
            Some(location) => where_is_answer(
                store,
                &location.name,
                "You can see these locations on the campus map in the Campus Navigation section.",
            ),
            None => not_found(&name),
        });
    }

    if let Some(caps) = DISTANCE_PATTERN.captures(query) {
        if let (Some(a), Some(b)) = (caps.get(1), caps.get(2)) {
            return Some(compare_answer(store, a.as_str().trim(), b.as_str().trim()));
        }
    }

    if lower.contains("where") && !lower.contains("where is") {
        let words: Vec<&str> = lower.split_whitespace().collect();
        let hit = store.locations().iter().find(|location| {
            let name = location.name.to_lowercase();
            words.iter().any(|w| name.contains(w) || w.contains(name.as_str()))
        });
        if let Some(location) = hit {
            return Some(where_is_answer(
                store,
                &location.name,
                "You can view the exact location on the Campus Map section.",
            ));
        }
    }

    if ["all locations", "list all", "show all", "campus locations"]
        .iter()
        .any(|k| lower.contains(k))
    {
        return Some(format!(
            "Here are all campus locations:\n\n{}\n\nAll these locations are mapped with Euclidean distances for accurate proximity information. You can explore these locations in detail in the Campus Navigation section.",
            store
                .locations()
                .iter()
                .map(|l| format!("• {}", l.name))
                .collect::<Vec<_>>()
                .join("\n")
        ));
    }

    let wants_nearest = lower.contains("nearest") || lower.contains("closest");
    if wants_nearest || lower.contains("farthest") || lower.contains("furthest") {
        if let Some(name) = capture(&ANCHOR_PATTERN, query, 1) {
            return Some(extremes_answer(store, &name, wants_nearest));
        }
    }

    if ["location", "map", "navigate", "direction"]
        .iter()
        .any(|k| lower.contains(k))
    {
        return Some(help_text());
    }

    None
}

fn capture(pattern: &Regex, query: &str, group: usize) -> Option<String> {
    pattern
        .captures(query)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim().to_string())
}

fn not_found(name: &str) -> String {
    format!(
        "I couldn't find \"{}\" on our campus map. Please try another location name.",
        name
    )
}

fn bullets(places: &[NearbyLocation]) -> String {
    places
        .iter()
        .map(|p| format!("• {}", p.location.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn nearby_answer(store: &LocationStore, name: &str) -> String {
    let Some(location) = store.location_by_name(name) else {
        return not_found(name);
    };

    let places = store.nearby_locations(&location.name, 3, true);
    if places.is_empty() {
        return format!("There are no notable locations near {}.", location.name);
    }

    format!(
        "Places near {}:\n\n{}\n\n{}",
        location.name,
        bullets(&places),
        PROXIMITY_NOTE
    )
}

fn where_is_answer(store: &LocationStore, name: &str, closing: &str) -> String {
    let places = store.nearby_locations(name, 3, true);
    format!(
        "{} can be found on campus. Nearby locations include:\n\n{}\n\n{} {}",
        name,
        bullets(&places),
        PROXIMITY_NOTE,
        closing
    )
}

/// Wording for a distance in map units; the number itself is never shown.
pub fn proximity_phrase(distance: f64) -> &'static str {
    match distance {
        d if d < 100.0 => "is very close to",
        d if d < 200.0 => "is relatively close to",
        d if d < 350.0 => "is at a moderate distance from",
        d if d < 500.0 => "is quite far from",
        _ => "is very far from",
    }
}

fn compare_answer(store: &LocationStore, first: &str, second: &str) -> String {
    let Some(a) = store.location_by_name(first) else {
        return not_found(first);
    };
    let Some(b) = store.location_by_name(second) else {
        return not_found(second);
    };

    let description = match store.distance(&a.name, &b.name) {
        Some(d) => format!("{} {} {}.", a.name, proximity_phrase(d), b.name),
        None => "These locations are on campus, but I don't have exact proximity information."
            .to_string(),
    };

    format!(
        "{} The proximity is calculated using Euclidean distance on the campus map.",
        description
    )
}

fn extremes_answer(store: &LocationStore, name: &str, nearest: bool) -> String {
    let Some(location) = store.location_by_name(name) else {
        return not_found(name);
    };

    let ranked = store.ranked_from(&location.name);
    if nearest {
        let closest: Vec<NearbyLocation> = ranked.into_iter().take(3).collect();
        format!(
            "The nearest locations to {} are:\n\n{}\n\n{}",
            location.name,
            bullets(&closest),
            PROXIMITY_NOTE
        )
    } else {
        let farthest: Vec<NearbyLocation> = ranked.into_iter().rev().take(3).collect();
        format!(
            "The farthest locations from {} are:\n\n{}\n\nLocations are listed in order of distance based on Euclidean distance.",
            location.name,
            bullets(&farthest)
        )
    }
}

fn help_text() -> String {
    [
        "I can help you navigate around campus using Euclidean distance calculations. You can ask me things like:",
        "",
        "• \"Where is the Central Library?\"",
        "• \"What's near the Administration Block?\"",
        "• \"How far is the Cafeteria from the Tennis Court?\"",
        "• \"Which locations are closest to the Boys Hostel?\"",
        "• \"Show me all campus locations\"",
        "",
        "Or you can visit the Campus Navigation section for an interactive map.",
    ]
    .join("\n")
}
