//! Student data source.
//!
//! The router only talks to [`StudentDataSource`]; [`MockDatabase`] serves the canned
//! portal fixtures and keeps reminders added at runtime in memory.

use crate::error::AppError;
use crate::models::{
    Assignment, CampusLocationDetail, Course, NewReminder, Reminder, Schedule, StudentInfo,
    StudyMaterial,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Result of a campus location lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationLookup {
    /// No name filter was given: every known place.
    All(Vec<CampusLocationDetail>),
    /// The first place whose name or ID contains the filter.
    One(CampusLocationDetail),
    /// A filter was given and nothing matched.
    NotFound,
}

/// Read/write interface to student records, swappable for a real backend.
#[async_trait]
pub trait StudentDataSource: Send + Sync + 'static {
    async fn student_info(&self, student_id: &str) -> Result<Option<StudentInfo>, AppError>;

    async fn student_schedule(&self, student_id: &str) -> Result<Vec<Schedule>, AppError>;

    async fn student_assignments(&self, student_id: &str) -> Result<Vec<Assignment>, AppError>;

    async fn student_courses(&self, student_id: &str) -> Result<Vec<Course>, AppError>;

    async fn student_reminders(&self, student_id: &str) -> Result<Vec<Reminder>, AppError>;

    async fn assignment_details(&self, assignment_id: &str) -> Result<Option<Assignment>, AppError>;

    /// Looks up campus places. The filter is a case-insensitive substring of the name or ID.
    async fn campus_locations(&self, name_filter: Option<&str>) -> Result<LocationLookup, AppError>;

    /// Study materials whose subject contains `subject` (case-insensitive); all when `None`.
    async fn study_materials(&self, subject: Option<&str>) -> Result<Vec<StudyMaterial>, AppError>;

    async fn add_reminder(&self, student_id: &str, reminder: NewReminder) -> Result<Reminder, AppError>;

    /// Returns `true` if a reminder was removed.
    async fn delete_reminder(&self, reminder_id: &str) -> Result<bool, AppError>;
}

/// In-memory data source backed by fixed fixtures.
pub struct MockDatabase {
    schedule: Vec<Schedule>,
    assignments: Vec<Assignment>,
    courses: Vec<Course>,
    locations: Vec<CampusLocationDetail>,
    materials: Vec<StudyMaterial>,
    reminders: RwLock<Vec<Reminder>>,
}

impl Default for MockDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDatabase {
    pub fn new() -> Self {
        info!("Initializing mock student database");
        Self {
            schedule: schedule_fixture(),
            assignments: assignment_fixture(),
            courses: course_fixture(),
            locations: location_fixture(),
            materials: study_material_fixture(),
            reminders: RwLock::new(reminder_fixture()),
        }
    }
}

#[async_trait]
impl StudentDataSource for MockDatabase {
    async fn student_info(&self, student_id: &str) -> Result<Option<StudentInfo>, AppError> {
        debug!("Fetching student info for ID: {}", student_id);
        Ok(Some(StudentInfo {
            id: student_id.to_string(),
            name: "John Doe".to_string(),
            email: format!("student{}@college.edu", student_id),
        }))
    }

    async fn student_schedule(&self, student_id: &str) -> Result<Vec<Schedule>, AppError> {
        debug!("Fetching schedule for student ID: {}", student_id);
        Ok(self.schedule.clone())
    }

    async fn student_assignments(&self, student_id: &str) -> Result<Vec<Assignment>, AppError> {
        debug!("Fetching assignments for student ID: {}", student_id);
        Ok(self.assignments.clone())
    }

    async fn student_courses(&self, student_id: &str) -> Result<Vec<Course>, AppError> {
        debug!("Fetching courses for student ID: {}", student_id);
        Ok(self.courses.clone())
    }

    async fn student_reminders(&self, student_id: &str) -> Result<Vec<Reminder>, AppError> {
        debug!("Fetching reminders for student ID: {}", student_id);
        Ok(self.reminders.read().await.clone())
    }

    async fn assignment_details(&self, assignment_id: &str) -> Result<Option<Assignment>, AppError> {
        debug!("Fetching details for assignment ID: {}", assignment_id);
        // Every ID resolves to the same detailed record.
        Ok(Some(Assignment {
            id: assignment_id.to_string(),
            title: "Programming Assignment 1".to_string(),
            course_id: "CS101".to_string(),
            course_name: "Introduction to Computer Science".to_string(),
            due_date: date(2024, 12, 15),
            description: "Implement a simple sorting algorithm using the techniques learned in class. Submit your code and a brief report explaining your implementation approach.".to_string(),
        }))
    }

    async fn campus_locations(&self, name_filter: Option<&str>) -> Result<LocationLookup, AppError> {
        debug!("Fetching campus location data for: {:?}", name_filter);
        let Some(filter) = name_filter else {
            return Ok(LocationLookup::All(self.locations.clone()));
        };

        let needle = filter.to_lowercase();
        Ok(self
            .locations
            .iter()
            .find(|loc| {
                loc.name.to_lowercase().contains(&needle) || loc.id.to_lowercase().contains(&needle)
            })
            .cloned()
            .map(LocationLookup::One)
            .unwrap_or(LocationLookup::NotFound))
    }

    async fn study_materials(&self, subject: Option<&str>) -> Result<Vec<StudyMaterial>, AppError> {
        let materials = match subject.filter(|s| !s.is_empty()) {
            Some(subject) => {
                let needle = subject.to_lowercase();
                self.materials
                    .iter()
                    .filter(|m| m.subject.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
            None => self.materials.clone(),
        };
        Ok(materials)
    }

    async fn add_reminder(&self, student_id: &str, reminder: NewReminder) -> Result<Reminder, AppError> {
        if reminder.title.trim().is_empty() {
            return Err(AppError::Validation("Reminder title must not be empty".to_string()));
        }

        let mut reminders = self.reminders.write().await;
        let created = Reminder {
            id: format!("REM{}", reminders.len() + 100),
            title: reminder.title,
            date: reminder.date,
            time: reminder.time,
            description: reminder.description,
        };
        info!("Adding reminder {} for student {}", created.id, student_id);
        reminders.push(created.clone());
        Ok(created)
    }

    async fn delete_reminder(&self, reminder_id: &str) -> Result<bool, AppError> {
        let mut reminders = self.reminders.write().await;
        let before = reminders.len();
        reminders.retain(|r| r.id != reminder_id);
        Ok(reminders.len() < before)
    }
}

// --- Fixtures ---

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

const SCHEDULE_ROWS: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("CS101", "Introduction to Computer Science", "Monday", "9:00 AM", "10:00 AM", "Building A, Room 101"),
    ("MATH201", "Calculus II", "Monday", "10:15 AM", "11:15 AM", "Building B, Room 203"),
    ("PHY101", "Physics I", "Monday", "11:30 AM", "12:30 PM", "Science Block, Room 105"),
    ("CHEM101", "General Chemistry", "Monday", "1:30 PM", "2:30 PM", "Science Block, Lab 202"),
    ("ENG101", "Technical Communication", "Monday", "2:45 PM", "3:45 PM", "Humanities Block, Room 304"),
    ("CS102", "Programming Lab", "Monday", "4:00 PM", "5:30 PM", "Computer Lab 1, Building A"),
    ("MATH202", "Differential Equations", "Tuesday", "9:00 AM", "10:00 AM", "Building B, Room 205"),
    ("CS201", "Data Structures", "Tuesday", "10:15 AM", "11:15 AM", "Building A, Room 102"),
    ("PHY102", "Physics II", "Tuesday", "11:30 AM", "12:30 PM", "Science Block, Room 106"),
    ("CHEM102", "Organic Chemistry", "Tuesday", "1:30 PM", "2:30 PM", "Science Block, Lab 203"),
    ("SOC101", "Sociology", "Tuesday", "2:45 PM", "3:45 PM", "Humanities Block, Room 305"),
    ("CS202", "Algorithms Lab", "Tuesday", "4:00 PM", "5:30 PM", "Computer Lab 2, Building A"),
    ("CS301", "Database Systems", "Wednesday", "9:00 AM", "10:00 AM", "Building A, Room 103"),
    ("MATH301", "Linear Algebra", "Wednesday", "10:15 AM", "11:15 AM", "Building B, Room 206"),
    ("ELEC101", "Basic Electronics", "Wednesday", "11:30 AM", "12:30 PM", "Electronics Block, Room 101"),
    ("CS302", "Operating Systems", "Wednesday", "1:30 PM", "2:30 PM", "Building A, Room 104"),
    ("PSY101", "Psychology", "Wednesday", "2:45 PM", "3:45 PM", "Humanities Block, Room 306"),
    ("ELEC102", "Digital Electronics Lab", "Wednesday", "4:00 PM", "5:30 PM", "Electronics Lab 1"),
    ("CS401", "Computer Networks", "Thursday", "9:00 AM", "10:00 AM", "Building A, Room 105"),
    ("MATH401", "Probability and Statistics", "Thursday", "10:15 AM", "11:15 AM", "Building B, Room 207"),
    ("CS402", "Software Engineering", "Thursday", "11:30 AM", "12:30 PM", "Building A, Room 106"),
    ("CS403", "Artificial Intelligence", "Thursday", "1:30 PM", "2:30 PM", "Building A, Room 107"),
    ("ECO101", "Economics", "Thursday", "2:45 PM", "3:45 PM", "Humanities Block, Room 307"),
    ("CS404", "Web Development Lab", "Thursday", "4:00 PM", "5:30 PM", "Computer Lab 3, Building A"),
    ("CS501", "Cybersecurity", "Friday", "9:00 AM", "10:00 AM", "Building A, Room 108"),
    ("MATH501", "Numerical Methods", "Friday", "10:15 AM", "11:15 AM", "Building B, Room 208"),
    ("CS502", "Machine Learning", "Friday", "11:30 AM", "12:30 PM", "Building A, Room 109"),
    ("CS503", "Cloud Computing", "Friday", "1:30 PM", "2:30 PM", "Building A, Room 110"),
    ("MGMT101", "Principles of Management", "Friday", "2:45 PM", "3:45 PM", "Humanities Block, Room 308"),
    ("CS504", "Project Work", "Friday", "4:00 PM", "5:30 PM", "Project Lab, Building A"),
];

fn schedule_fixture() -> Vec<Schedule> {
    SCHEDULE_ROWS
        .iter()
        .enumerate()
        .map(|(i, (course_id, course_name, day, start, end, location))| Schedule {
            id: (i + 1).to_string(),
            course_id: course_id.to_string(),
            course_name: course_name.to_string(),
            day: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            location: location.to_string(),
        })
        .collect()
}

fn assignment_fixture() -> Vec<Assignment> {
    vec![
        Assignment {
            id: "1".to_string(),
            title: "Programming Assignment 1".to_string(),
            course_id: "CS101".to_string(),
            course_name: "Introduction to Computer Science".to_string(),
            due_date: date(2024, 12, 15),
            description: "Implement a simple sorting algorithm".to_string(),
        },
        Assignment {
            id: "2".to_string(),
            title: "Problem Set 3".to_string(),
            course_id: "MATH201".to_string(),
            course_name: "Calculus II".to_string(),
            due_date: date(2024, 12, 10),
            description: "Solve integration problems from Chapter 5".to_string(),
        },
    ]
}

fn course_fixture() -> Vec<Course> {
    vec![
        Course {
            id: "1".to_string(),
            name: "Introduction to Computer Science".to_string(),
            code: "CS101".to_string(),
            instructor: "Dr. Smith".to_string(),
            credits: 3,
        },
        Course {
            id: "2".to_string(),
            name: "Calculus II".to_string(),
            code: "MATH201".to_string(),
            instructor: "Dr. Johnson".to_string(),
            credits: 4,
        },
    ]
}

fn reminder_fixture() -> Vec<Reminder> {
    vec![
        Reminder {
            id: "1".to_string(),
            title: "Study for CS101 Exam".to_string(),
            date: date(2024, 12, 10),
            time: "14:00".to_string(),
            description: "Review all material from chapters 1-5".to_string(),
        },
        Reminder {
            id: "2".to_string(),
            title: "MATH201 Group Meeting".to_string(),
            date: date(2024, 12, 8),
            time: "15:30".to_string(),
            description: "Meet with study group in library room 302".to_string(),
        },
        Reminder {
            id: "3".to_string(),
            title: "Office Hours with Dr. Smith".to_string(),
            date: date(2024, 12, 9),
            time: "11:00".to_string(),
            description: "Discuss final project requirements".to_string(),
        },
    ]
}

/// (id, name, type, description, opening hours, nearby places)
type LocationRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    &'static [&'static str],
);

const LOCATION_ROWS: &[LocationRow] = &[
    ("gate_main", "Main Gate", "entrance", "Located at the main entrance of the campus. This gate opens only twice a day.", Some("9 AM and 4 PM only"), &["Polytechnic", "AIGS", "Pharmacy", "Allied Science"]),
    ("gate_2", "Gate 2", "entrance", "Located near the Pharmacy department and leads to Campus Mart.", Some("9 AM to 6 PM"), &["Pharmacy", "Campus Mart"]),
    ("gate_3", "Gate 3", "entrance", "Located at the back of the campus adjacent to the bike parking area.", Some("9 AM to 8 PM"), &["Two Wheeler Parking"]),
    ("gate_4", "Gate 4", "entrance", "Located at the back of the campus next to the car parking area.", Some("9 AM to 8 PM"), &["Car Parking"]),
    ("gate_5", "Gate 5", "entrance", "Located near the cottage area on the eastern side of campus.", Some("9 AM, 12 PM-1:30 PM, and 4 PM only"), &["Cottage"]),
    ("gate_6", "Gate 6", "entrance", "Located near the hostel on the northern side of campus.", Some("9 AM, 12 PM-1:30 PM, and 4 PM only"), &["Boys Hostel"]),
    ("admin_block", "Administration Block", "academic", "Located at the entrance area of the campus, right next to the Auditorium.", None, &["Auditorium", "Students Affairs/Admissions"]),
    ("auditorium", "Auditorium", "academic", "Located next to the Administration Block near the center of the campus.", None, &["Administration Block"]),
    ("student_affairs", "Students Affairs/Admissions", "academic", "Located inside the Administration Block on the ground floor.", None, &["Administration Block"]),
    ("library", "Central Library", "academic", "Located below Coffee Express. Main library building with study spaces.", None, &["Coffee Express", "Basket Ball Courts"]),
    ("basket_courts", "Basket Ball Courts", "sports", "Located adjacent to the Central Library, near the Volleyball Court.", None, &["Central Library", "Volleyball Court"]),
    ("volleyball_court", "Volleyball Court", "sports", "Located next to the Basketball Courts, near the Stadium.", None, &["Basket Ball Courts", "Stadium"]),
    ("cafeteria", "Cafeteria", "food", "Located near the View Tube in the northern part of the campus.", None, &["View Tube"]),
    ("view_tube", "View Tube", "recreation", "Located between the Cafeteria and Boys Hostel in the northern area.", None, &["Cafeteria", "Boys Hostel"]),
    ("boys_hostel", "Boys Hostel", "accommodation", "Located near Gate 6 in the northern part of the campus.", None, &["Gate 6", "View Tube"]),
    ("green_forest", "Green Forest", "natural", "Located on the western side of the campus, adjacent to the Rain Water Harvested Lake.", None, &["Rain Water Harvested Lake"]),
    ("lake", "Rain Water Harvested Lake", "natural", "Located between the Green Forest and the Stadium on the western side.", None, &["Green Forest", "Stadium"]),
    ("water_plant", "Water Treatment Plant", "facility", "Located at the northwestern corner of the campus, near the Green Forest.", None, &["Green Forest"]),
    ("two_wheeler", "Two Wheeler Parking", "parking", "Located near Gate 3 at the southern part of the campus.", None, &["Gate 3"]),
    ("car_parking", "Car Parking", "parking", "Located near Gate 4 at the southeastern part of the campus.", None, &["Gate 4"]),
    ("stadium", "Smt. Nagarathnamma Stadium", "sports", "Located in the center of the campus, between the Volleyball Court and Rain Water Harvested Lake.", None, &["Volleyball Court", "Rain Water Harvested Lake"]),
    ("lassi_house", "Lassi House", "food", "Located directly behind the CPRD building, popular for refreshing lassi drinks.", None, &["CPRD"]),
    ("coffee_express", "Coffee Express", "food", "Located directly above the Central Library, popular for mojito and coffee.", None, &["Central Library"]),
    ("campus_mart", "Campus Mart", "shop", "Located near Gate 2, which leads to the Pharmacy department.", None, &["Pharmacy", "Gate 2"]),
    ("cprd", "CPRD", "academic", "Located next to the Lassi House, in the eastern part of the campus.", None, &["Lassi House"]),
    ("pharmacy", "Pharmacy Department", "academic", "Located near Gate 2, beside the Allied Science building.", None, &["Allied Science", "Gate 2", "Campus Mart"]),
    ("allied_science", "Allied Science", "academic", "Located next to the Pharmacy Department, accessible from the Main Gate.", None, &["Pharmacy", "Main Gate"]),
    ("polytechnic", "Polytechnic", "academic", "Located near the Main Gate, on the path branching left from the entrance.", None, &["Main Gate", "AIGS"]),
    ("aigs", "AIGS", "academic", "Located next to the Polytechnic building, accessible from the Main Gate.", None, &["Polytechnic", "Main Gate"]),
];

fn location_fixture() -> Vec<CampusLocationDetail> {
    LOCATION_ROWS
        .iter()
        .map(|(id, name, kind, description, hours, nearby)| CampusLocationDetail {
            id: id.to_string(),
            name: name.to_string(),
            location_type: kind.to_string(),
            description: description.to_string(),
            opening_hours: hours.map(str::to_string),
            nearby_places: nearby.iter().map(|p| p.to_string()).collect(),
        })
        .collect()
}

const MATERIAL_SUBJECTS: [&str; 10] = [
    "Computer Science",
    "Data Structures",
    "Databases",
    "Web Development",
    "Artificial Intelligence",
    "Machine Learning",
    "Computer Networks",
    "Operating Systems",
    "Software Engineering",
    "Cloud Computing",
];

fn study_material_fixture() -> Vec<StudyMaterial> {
    (0..30)
        .map(|i| {
            let id = format!("MAT{}", 100 + i);
            let subject = MATERIAL_SUBJECTS[i % MATERIAL_SUBJECTS.len()];
            StudyMaterial {
                title: format!("{} - Study Resource {}", subject, i / MATERIAL_SUBJECTS.len() + 1),
                description: format!("Comprehensive study material for {}.", subject),
                url: format!("https://example.com/materials/{}.pdf", id),
                subject: subject.to_string(),
                id,
            }
        })
        .collect()
}
