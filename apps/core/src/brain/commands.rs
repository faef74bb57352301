//! Parsing for `!` direct commands.
//!
//! Direct commands skip the keyword scorer and map straight to a data category with a
//! fixed keyword table.

use super::classifier::{Category, DayFilter, ASSIGNMENT_ID_PATTERN, WEEKDAYS};

/// Prefix that marks a direct command.
pub const COMMAND_PREFIX: char = '!';

pub const HELP_MESSAGE: &str = "I couldn't determine what college data you're looking for. Try being more specific or use one of these formats:\n!schedule - for your class schedule\n!assignments - for your homework\n!courses - for your enrolled courses\n!location - for campus locations and buildings";

/// Category table for direct commands, checked in order. Assignment words come first
/// so that "project due friday" is not read as a schedule request.
const COMMAND_CATEGORIES: &[(Category, &[&str])] = &[
    (
        Category::Assignments,
        &["assignment", "homework", "due", "task", "project"],
    ),
    (
        Category::Schedule,
        &[
            "schedule", "class", "timetable", "today", "tomorrow",
            "monday", "tuesday", "wednesday", "thursday", "friday",
        ],
    ),
    (Category::Courses, &["course", "subject", "enrolled"]),
    (Category::Reminders, &["reminder", "event"]),
    (
        Category::Location,
        &[
            "campus", "location", "map", "building", "gate", "where",
            "library", "cafeteria", "food", "coffee", "hostel", "parking",
        ],
    ),
];

/// Canonical place names and the phrases that refer to them, checked in order.
const LOCATION_ALIASES: &[(&str, &[&str])] = &[
    ("main gate", &["main gate", "main entrance", "entrance gate", "gate 1", "gate one"]),
    ("gate 2", &["gate 2", "gate two", "second gate", "pharmacy gate"]),
    ("gate 3", &["gate 3", "gate three", "third gate", "bike gate", "two wheeler gate"]),
    ("gate 4", &["gate 4", "gate four", "fourth gate", "car gate", "parking gate"]),
    ("gate 5", &["gate 5", "gate five", "fifth gate", "cottage gate"]),
    ("gate 6", &["gate 6", "gate six", "sixth gate", "hostel gate"]),
    ("library", &["library", "central library", "main library", "study hall"]),
    ("coffee express", &["coffee", "coffee express", "coffee shop", "mojito", "cafe"]),
    ("lassi house", &["lassi", "lassi house", "lassi shop"]),
    ("campus mart", &["mart", "campus mart", "store", "shop", "campus store"]),
    ("cafeteria", &["cafeteria", "canteen", "dining hall", "food court"]),
    ("hostel", &["hostel", "boys hostel", "dormitory", "accommodation"]),
    ("administration", &["admin", "administration", "administration block", "admin block", "office"]),
    ("auditorium", &["auditorium", "hall", "event space", "function hall"]),
    ("student affairs", &["student affairs", "admissions", "admission office", "registration"]),
    ("pharmacy", &["pharmacy", "pharmacy department", "pharma"]),
    ("allied science", &["allied science", "allied health", "health sciences"]),
    ("polytechnic", &["polytechnic", "poly", "technical college"]),
    ("aigs", &["aigs"]),
    ("cprd", &["cprd"]),
    ("stadium", &["stadium", "smt. nagarathnamma stadium", "sports field", "ground"]),
    ("volleyball court", &["volleyball", "volleyball court"]),
    ("basketball courts", &["basketball", "basketball court", "basket ball", "courts"]),
    ("view tube", &["view tube", "recreation area", "student recreation"]),
    ("green forest", &["forest", "green forest", "woods", "trees"]),
    ("lake", &["lake", "rain water lake", "harvested lake", "water body"]),
    ("water treatment plant", &["water plant", "treatment plant", "water treatment"]),
    ("car parking", &["car park", "car parking", "automobile parking", "four wheeler"]),
    ("two wheeler parking", &["bike parking", "two wheeler", "motorcycle", "scooter", "bike stand"]),
];

/// Generic facility types, tried when no named place matched.
const FACILITY_TYPES: &[(&str, &[&str])] = &[
    ("gate", &["gate", "entrance", "exit"]),
    ("parking", &["parking", "park"]),
    ("food", &["food", "eat", "restaurant", "cafe", "dining"]),
    ("academic", &["class", "classroom", "lecture hall", "department", "study"]),
    ("sports", &["sport", "play", "game", "athletic", "recreation", "fitness"]),
];

/// Text of a direct command without its `!` prefix, or `None` if `query` is not one.
pub fn command_body(query: &str) -> Option<&str> {
    query.strip_prefix(COMMAND_PREFIX).map(str::trim)
}

/// Category for a direct command body (prefix already stripped).
pub fn command_category(body: &str) -> Option<Category> {
    let normalized = body.trim().to_lowercase();
    COMMAND_CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(category, _)| *category)
}

/// Assignment number in "assignment 3" style text.
pub fn assignment_number(text: &str) -> Option<String> {
    ASSIGNMENT_ID_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Day filter for direct commands: today, else tomorrow, else the first weekday named.
pub fn simple_day_filter(text: &str) -> Option<DayFilter> {
    let normalized = text.to_lowercase();
    if normalized.contains("today") || normalized.contains("todays") {
        return Some(DayFilter::Today);
    }
    if normalized.contains("tomorrow") {
        return Some(DayFilter::Tomorrow);
    }
    WEEKDAYS
        .iter()
        .find(|(name, _)| normalized.contains(name))
        .map(|(_, day)| DayFilter::Weekday(*day))
}

/// Canonical place or facility name mentioned in `text`.
pub fn specific_location(text: &str) -> Option<&'static str> {
    let normalized = text.to_lowercase();
    let mentions = |aliases: &[&str]| aliases.iter().any(|a| normalized.contains(a));

    LOCATION_ALIASES
        .iter()
        .chain(FACILITY_TYPES.iter())
        .find(|(_, aliases)| mentions(aliases))
        .map(|(name, _)| *name)
}

/// Prompt asking the language model which category an unclear command is about.
pub fn categorization_prompt(body: &str) -> String {
    format!(
        "The user is asking about their college data with this query: {}. What specific category of information are they looking for? Is it about their schedule, assignments, courses, reminders, or campus locations?",
        body
    )
}

/// Reads a category out of the model's free-text categorization answer.
pub fn category_from_answer(answer: &str) -> Option<Category> {
    let lower = answer.to_lowercase();
    if lower.contains("schedule") && !lower.contains("assignment") {
        Some(Category::Schedule)
    } else if lower.contains("assignment") {
        Some(Category::Assignments)
    } else if lower.contains("course") {
        Some(Category::Courses)
    } else if lower.contains("reminder") {
        Some(Category::Reminders)
    } else if ["location", "campus", "map", "building"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Some(Category::Location)
    } else {
        None
    }
}
