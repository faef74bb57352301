use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity of the caller, passed explicitly into every router call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// The logged-in student's ID, if the session carries one.
    pub student_id: Option<String>,
    /// Whether the caller has passed the portal login.
    pub is_authenticated: bool,
}

impl SessionContext {
    /// An authenticated session for the given student.
    pub fn authenticated(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            is_authenticated: true,
        }
    }

    /// A session with no identity; data lookups are refused.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The session's student ID, or `fallback` when none is set.
    pub fn student_id_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.student_id.as_deref().unwrap_or(fallback)
    }
}

/// Basic profile of a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A course the student is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub credits: u32,
}

/// An assignment with its due date. `course_id` is not checked against any course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub course_id: String,
    pub course_name: String,
    pub due_date: NaiveDate,
    pub description: String,
}

/// One weekly class slot. `day` is a capitalized weekday name ("Monday").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub course_id: String,
    pub course_name: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

/// A personal reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub description: String,
}

/// Input for creating a reminder; the ID is assigned by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReminder {
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub description: String,
}

/// Descriptive record for a campus place, as served by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusLocationDetail {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub nearby_places: Vec<String>,
}

/// A downloadable study resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub id: String,
    pub subject: String,
    pub title: String,
    pub description: String,
    pub url: String,
}
