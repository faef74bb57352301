//! Keyword-scored query classification.
//!
//! Decides whether a question should be answered from student records or handed to
//! the language model, picks a data category and extracts the fields the router needs
//! (course and assignment IDs, day filters, location hints). Pure regex and substring
//! matching, no model involved.

use crate::config::DEMO_STUDENT_ID;
use crate::models::SessionContext;
use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Score added per matched database keyword.
const SCORE_PER_MATCH: f64 = 0.15;
const MAX_CONFIDENCE: f64 = 0.95;
/// Confidence must be strictly above this for a database answer.
pub const DATABASE_THRESHOLD: f64 = 0.3;

/// Keywords counted towards the database score. Each entry counts once per query;
/// "where is" appears twice on purpose and counts twice.
const DATABASE_KEYWORDS: &[&str] = &[
    "schedule", "class schedule", "timetable", "classes",
    "assignment", "assignments", "homework", "due date", "deadline",
    "course", "courses", "my course", "my classes", "enrolled",
    "grade", "grades", "transcript", "score", "marks",
    "professor", "instructor", "teacher", "faculty",
    "semester", "term",
    "exam", "test", "quiz", "final",
    "syllabus", "curriculum",
    "enrollment", "register", "registration",
    "when is", "where is", "what time",
    "campus", "location", "building", "gate", "map", "where is", "how to get to",
    "library", "cafeteria", "parking", "stadium", "hostel", "entrance", "exit",
    "food", "eat", "coffee", "lassi", "store", "shop", "mart",
    "today", "tomorrow", "my schedule",
];

/// Categories in priority order; the first with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Schedule,
        &[
            "schedule", "timetable", "when is", "what time", "where is", "my classes",
            "today", "today's", "todays", "class today", "classes today",
            "tomorrow", "tomorrow's", "tomorrows",
            "monday", "tuesday", "wednesday", "thursday", "friday",
            "this week", "next week",
        ],
    ),
    (
        Category::Assignments,
        &["assignment", "homework", "due date", "deadline", "submission"],
    ),
    (
        Category::Courses,
        &["course", "enrolled", "my course", "my classes", "curriculum", "syllabus"],
    ),
    (Category::Grades, &["grade", "score", "marks", "transcript", "gpa"]),
    (
        Category::Location,
        &[
            // areas and directions
            "campus", "location", "building", "map", "where is", "how to get to", "where can i find",
            "where are", "take me to", "directions to", "way to", "located", "situated",
            // places
            "gate", "entrance", "exit", "main gate", "library", "cafeteria", "parking",
            "hostel", "coffee", "lassi", "mart", "department", "block", "stadium",
            "administration", "auditorium", "court", "basketball", "tennis", "view tube",
            "pharmacy", "allied science", "polytechnic", "aigs", "cprd",
            // opening hours
            "opening", "closing", "hours", "timings", "when does", "open", "close", "time",
        ],
    ),
];

pub(crate) const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

const CLASS_TODAY_PHRASES: [&str; 6] = [
    "class today",
    "classes today",
    "today's class",
    "today's classes",
    "todays class",
    "todays classes",
];

static COURSE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]{2,4})\s*(\d{3})\b").expect("Invalid regex: course id pattern")
});

pub(crate) static ASSIGNMENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)assignment\s*(\d+)").expect("Invalid regex: assignment id pattern")
});

static GATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)gate\s*(\d+|main)").expect("Invalid regex: gate pattern")
});

static BUILDING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(main gate|gate \d|administration|auditorium|student affairs|library|cafeteria|hostel|parking|stadium|coffee|lassi|campus mart|pharmacy|allied science|polytechnic|aigs|cprd|basketball|tennis|view tube|green forest|lake|water treatment)")
        .expect("Invalid regex: building pattern")
});

static LOCATION_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(entrance|exit|building|department|block|gate|court|shop|store|cafe)")
        .expect("Invalid regex: location type pattern")
});

/// Location query kinds, later entries override earlier ones.
static LOCATION_QUERY_PATTERNS: LazyLock<Vec<(Regex, LocationQueryKind)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)(open|close|timing|hour|time)").expect("Invalid regex: hours pattern"),
            LocationQueryKind::Hours,
        ),
        (
            Regex::new(r"(?i)(where|location|find|direction|how to get|way to)")
                .expect("Invalid regex: location pattern"),
            LocationQueryKind::Location,
        ),
        (
            Regex::new(r"(?i)(near|nearby|close to|adjacent)").expect("Invalid regex: nearby pattern"),
            LocationQueryKind::Nearby,
        ),
    ]
});

/// Where the answer should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Database,
    Llm,
}

/// Kind of student data a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Schedule,
    Assignments,
    Courses,
    Grades,
    Reminders,
    Location,
    Unknown,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Schedule => "SCHEDULE",
            Category::Assignments => "ASSIGNMENTS",
            Category::Courses => "COURSES",
            Category::Grades => "GRADES",
            Category::Reminders => "REMINDERS",
            Category::Location => "LOCATION",
            Category::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Day a schedule question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    Today,
    Tomorrow,
    Weekday(Weekday),
}

impl DayFilter {
    /// The weekday this filter points at, relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> Weekday {
        match self {
            DayFilter::Today => today.weekday(),
            DayFilter::Tomorrow => today.weekday().succ(),
            DayFilter::Weekday(day) => *day,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayFilter::Today => "today",
            DayFilter::Tomorrow => "tomorrow",
            DayFilter::Weekday(day) => weekday_key(*day),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for DayFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Capitalized weekday name as stored in schedule records ("Monday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// What a location question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationQueryKind {
    Hours,
    Location,
    Nearby,
}

/// Structured fields pulled out of a database query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInfo {
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_filter: Option<DayFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<LocationQueryKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub query_type: QueryType,
    /// 0.0 - 1.0
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_info: Option<ExtractedInfo>,
}

type DayRule = fn(&str) -> Option<DayFilter>;

/// Day filter rules. All rules run and the last match wins.
const DAY_RULES: [DayRule; 4] = [mentions_today, first_weekday, mentions_tomorrow, class_today_phrase];

fn mentions_today(q: &str) -> Option<DayFilter> {
    q.contains("today").then_some(DayFilter::Today)
}

fn first_weekday(q: &str) -> Option<DayFilter> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| q.contains(name))
        .map(|(_, day)| DayFilter::Weekday(*day))
}

fn mentions_tomorrow(q: &str) -> Option<DayFilter> {
    q.contains("tomorrow").then_some(DayFilter::Tomorrow)
}

fn class_today_phrase(q: &str) -> Option<DayFilter> {
    CLASS_TODAY_PHRASES
        .iter()
        .any(|p| q.contains(p))
        .then_some(DayFilter::Today)
}

/// Keyword classifier. Holds only the student ID used for sessions without one.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    demo_student_id: String,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClassifier {
    pub fn new() -> Self {
        Self::with_demo_student_id(DEMO_STUDENT_ID)
    }

    pub fn with_demo_student_id(demo_student_id: impl Into<String>) -> Self {
        Self {
            demo_student_id: demo_student_id.into(),
        }
    }

    /// Student ID used when the session does not carry one.
    pub fn demo_student_id(&self) -> &str {
        &self.demo_student_id
    }

    /// Classifies a query. The session supplies the student ID for extracted fields.
    pub fn classify(&self, query: &str, session: &SessionContext) -> ClassificationResult {
        let normalized = query.to_lowercase();

        let matches = DATABASE_KEYWORDS
            .iter()
            .filter(|k| normalized.contains(*k))
            .count();
        let confidence = (matches as f64 * SCORE_PER_MATCH).min(MAX_CONFIDENCE);

        if confidence <= DATABASE_THRESHOLD {
            debug!(matches, confidence, "Query routed to language model");
            return ClassificationResult {
                query_type: QueryType::Llm,
                confidence: 1.0 - confidence,
                category: None,
                extracted_info: None,
            };
        }

        let category = determine_category(&normalized);
        let student_id = session.student_id_or(&self.demo_student_id);
        let extracted = extract_info(&normalized, category, student_id);
        debug!(matches, confidence, %category, "Query routed to database");

        ClassificationResult {
            query_type: QueryType::Database,
            confidence,
            category: Some(category),
            extracted_info: Some(extracted),
        }
    }
}

fn determine_category(query: &str) -> Category {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| query.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown)
}

/// Day filter from the ordered rule list, last match wins.
pub fn detect_day_filter(query: &str) -> Option<DayFilter> {
    let normalized = query.to_lowercase();
    DAY_RULES
        .iter()
        .filter_map(|rule| rule(&normalized))
        .last()
}

fn extract_info(query: &str, category: Category, student_id: &str) -> ExtractedInfo {
    let mut info = ExtractedInfo {
        student_id: student_id.to_string(),
        ..Default::default()
    };

    info.course_id = COURSE_ID_PATTERN
        .find(query)
        .map(|m| m.as_str().split_whitespace().collect::<String>());

    info.assignment_id = ASSIGNMENT_ID_PATTERN
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    match category {
        Category::Schedule => info.day_filter = detect_day_filter(query),
        Category::Location => extract_location_fields(query, &mut info),
        _ => {}
    }

    info
}

fn extract_location_fields(query: &str, info: &mut ExtractedInfo) {
    let first_group = |pattern: &Regex| {
        pattern
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    };

    info.gate_name = first_group(&GATE_PATTERN);
    info.building_name = first_group(&BUILDING_PATTERN);
    info.location_type = first_group(&LOCATION_TYPE_PATTERN);

    for (pattern, kind) in LOCATION_QUERY_PATTERNS.iter() {
        if pattern.is_match(query) {
            info.query_type = Some(*kind);
        }
    }
}
