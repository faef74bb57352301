//! Renders fetched student data as chat text.

use crate::brain::{weekday_name, Category, DayFilter};
use crate::models::{Assignment, CampusLocationDetail, Course, Reminder, Schedule};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, error};

pub const NO_DATA_MESSAGE: &str =
    "I couldn't find any relevant information in the database. Can you provide more details?";

const FORMAT_FAILURE_MESSAGE: &str =
    "I found some information but had trouble formatting it. Please try asking in a different way.";

/// Data fetched for one answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryData {
    Schedule(Vec<Schedule>),
    Assignments(Vec<Assignment>),
    Assignment(Assignment),
    Courses(Vec<Course>),
    Reminders(Vec<Reminder>),
    Locations(Vec<CampusLocationDetail>),
    Location(CampusLocationDetail),
}

impl QueryData {
    fn is_empty(&self) -> bool {
        match self {
            QueryData::Schedule(v) => v.is_empty(),
            QueryData::Assignments(v) => v.is_empty(),
            QueryData::Courses(v) => v.is_empty(),
            QueryData::Reminders(v) => v.is_empty(),
            QueryData::Locations(v) => v.is_empty(),
            QueryData::Assignment(_) | QueryData::Location(_) => false,
        }
    }
}

/// `M/D/YYYY`, no zero padding.
pub fn display_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Formats `data` for `category`. `today` anchors relative day filters.
pub fn format_results(
    data: Option<&QueryData>,
    category: Category,
    day_filter: Option<DayFilter>,
    today: NaiveDate,
) -> String {
    debug!(%category, ?day_filter, "Formatting database results");

    let data = match data {
        Some(d) if !d.is_empty() => d,
        _ => {
            return match (category, day_filter) {
                (Category::Schedule, Some(filter)) => no_classes_message(filter, today),
                _ => NO_DATA_MESSAGE.to_string(),
            };
        }
    };

    match (category, data) {
        (Category::Schedule, QueryData::Schedule(entries)) => {
            format_schedule(entries, day_filter, today)
        }
        (Category::Assignments, QueryData::Assignments(list)) => format!(
            "Here are your assignments:\n\n{}",
            list.iter()
                .map(|a| format!(
                    "• {} - {}\n  Due: {}\n  {}",
                    a.title,
                    a.course_name,
                    display_date(a.due_date),
                    a.description
                ))
                .collect::<Vec<_>>()
                .join("\n\n")
        ),
        (Category::Assignments, QueryData::Assignment(a)) => format!(
            "Assignment: {}\nCourse: {}\nDue: {}\n\nDescription: {}",
            a.title,
            a.course_name,
            display_date(a.due_date),
            a.description
        ),
        (Category::Courses, QueryData::Courses(courses)) => format!(
            "You are enrolled in the following courses:\n\n{}",
            courses
                .iter()
                .map(|c| format!(
                    "• {} ({})\n  Instructor: {}\n  Credits: {}",
                    c.name, c.code, c.instructor, c.credits
                ))
                .collect::<Vec<_>>()
                .join("\n\n")
        ),
        (Category::Reminders, QueryData::Reminders(reminders)) => format!(
            "Here are your reminders:\n\n{}",
            reminders
                .iter()
                .map(|r| format!(
                    "• {}\n  Date: {}, Time: {}\n  {}",
                    r.title,
                    display_date(r.date),
                    r.time,
                    r.description
                ))
                .collect::<Vec<_>>()
                .join("\n\n")
        ),
        (Category::Location, QueryData::Locations(locations)) => format!(
            "Here are the campus locations:\n\n{}",
            locations
                .iter()
                .map(|l| format!("• {} ({})", l.name, l.location_type))
                .collect::<Vec<_>>()
                .join("\n")
        ),
        (Category::Location, QueryData::Location(location)) => format_location(location),
        (_, other) => raw_dump(other),
    }
}

fn no_classes_message(filter: DayFilter, today: NaiveDate) -> String {
    format!(
        "You don't have any classes scheduled for {}.",
        day_phrase(filter, today)
    )
}

/// "today (Monday)", "tomorrow (Tuesday)" or the bare weekday key.
fn day_phrase(filter: DayFilter, today: NaiveDate) -> String {
    match filter {
        DayFilter::Today | DayFilter::Tomorrow => format!(
            "{} ({})",
            filter.label(),
            weekday_name(filter.resolve(today))
        ),
        DayFilter::Weekday(_) => filter.label().to_string(),
    }
}

fn format_schedule(entries: &[Schedule], day_filter: Option<DayFilter>, today: NaiveDate) -> String {
    let Some(filter) = day_filter else {
        return format!(
            "Here's your schedule:\n\n{}",
            entries
                .iter()
                .map(|s| format!(
                    "• {} ({})\n  {}, {} - {}\n  Location: {}",
                    s.course_name, s.course_id, s.day, s.start_time, s.end_time, s.location
                ))
                .collect::<Vec<_>>()
                .join("\n\n")
        );
    };

    let target = weekday_name(filter.resolve(today));
    let matching: Vec<&Schedule> = entries.iter().filter(|s| s.day == target).collect();
    debug!("Filtered schedule for {}: {} of {}", target, matching.len(), entries.len());

    if matching.is_empty() {
        return no_classes_message(filter, today);
    }

    format!(
        "Here's your schedule for {}:\n\n{}",
        day_phrase(filter, today),
        matching
            .iter()
            .map(|s| format!(
                "• {} ({})\n  {} - {}\n  Location: {}",
                s.course_name, s.course_id, s.start_time, s.end_time, s.location
            ))
            .collect::<Vec<_>>()
            .join("\n\n")
    )
}

fn format_location(location: &CampusLocationDetail) -> String {
    let mut result = format!("{} is {}", location.name, location.description);
    if let Some(hours) = &location.opening_hours {
        result.push_str(&format!("\nOpening Hours: {}", hours));
    }
    if !location.nearby_places.is_empty() {
        result.push_str(&format!("\nNearby: {}", location.nearby_places.join(", ")));
    }
    result
}

fn raw_dump(data: &QueryData) -> String {
    match serde_json::to_string_pretty(data) {
        Ok(json) => format!("Here's the information from the database:\n\n{}", json),
        Err(e) => {
            error!("Error formatting database results: {}", e);
            FORMAT_FAILURE_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 9).unwrap()
    }

    fn class(id: &str, day: &str) -> Schedule {
        Schedule {
            id: id.to_string(),
            course_id: format!("CS{}", id),
            course_name: "Operating Systems".to_string(),
            day: day.to_string(),
            start_time: "9:00 AM".to_string(),
            end_time: "10:00 AM".to_string(),
            location: "Building A, Room 104".to_string(),
        }
    }

    #[test]
    fn test_display_date_has_no_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(display_date(date), "3/5/2024");
    }

    #[test]
    fn test_empty_schedule_with_filter_names_the_day() {
        let data = QueryData::Schedule(vec![]);
        assert_eq!(
            format_results(Some(&data), Category::Schedule, Some(DayFilter::Today), monday()),
            "You don't have any classes scheduled for today (Monday)."
        );
        assert_eq!(
            format_results(None, Category::Schedule, Some(DayFilter::Tomorrow), monday()),
            "You don't have any classes scheduled for tomorrow (Tuesday)."
        );
        assert_eq!(
            format_results(None, Category::Courses, None, monday()),
            NO_DATA_MESSAGE
        );
    }

    #[test]
    fn test_weekend_filter_has_no_classes() {
        let data = QueryData::Schedule(vec![class("1", "Monday")]);
        assert_eq!(
            format_results(
                Some(&data),
                Category::Schedule,
                Some(DayFilter::Weekday(Weekday::Sat)),
                monday()
            ),
            "You don't have any classes scheduled for saturday."
        );
    }

    #[test]
    fn test_filtered_schedule_keeps_matching_day_only() {
        let data = QueryData::Schedule(vec![class("1", "Monday"), class("2", "Tuesday")]);
        let text = format_results(
            Some(&data),
            Category::Schedule,
            Some(DayFilter::Weekday(Weekday::Tue)),
            monday(),
        );
        assert_eq!(
            text,
            "Here's your schedule for tuesday:\n\n• Operating Systems (CS2)\n  9:00 AM - 10:00 AM\n  Location: Building A, Room 104"
        );
    }

    #[test]
    fn test_unfiltered_schedule_includes_day() {
        let data = QueryData::Schedule(vec![class("1", "Monday")]);
        let text = format_results(Some(&data), Category::Schedule, None, monday());
        assert!(text.starts_with("Here's your schedule:\n\n"));
        assert!(text.contains("  Monday, 9:00 AM - 10:00 AM"));
    }

    #[test]
    fn test_single_location_has_hours_and_nearby() {
        let data = QueryData::Location(CampusLocationDetail {
            id: "gate_2".to_string(),
            name: "Gate 2".to_string(),
            location_type: "entrance".to_string(),
            description: "Located near the Pharmacy department.".to_string(),
            opening_hours: Some("9 AM to 6 PM".to_string()),
            nearby_places: vec!["Pharmacy".to_string(), "Campus Mart".to_string()],
        });
        assert_eq!(
            format_results(Some(&data), Category::Location, None, monday()),
            "Gate 2 is Located near the Pharmacy department.\nOpening Hours: 9 AM to 6 PM\nNearby: Pharmacy, Campus Mart"
        );
    }

    #[test]
    fn test_mismatched_data_falls_back_to_json() {
        let data = QueryData::Schedule(vec![class("1", "Monday")]);
        let text = format_results(Some(&data), Category::Grades, None, monday());
        assert!(text.starts_with("Here's the information from the database:\n\n["));
        assert!(text.contains("\"courseId\": \"CS1\""));
    }
}
