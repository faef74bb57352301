//! Database Module Tests
//!
//! Behaviour of the mock student data source seen through the `StudentDataSource`
//! trait object, the way the router uses it.

use crate::database::{LocationLookup, MockDatabase, StudentDataSource};
use crate::error::AppError;
use crate::models::NewReminder;
use chrono::NaiveDate;
use std::sync::Arc;

fn data_source() -> Arc<dyn StudentDataSource> {
    Arc::new(MockDatabase::new())
}

fn reminder(title: &str) -> NewReminder {
    NewReminder {
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 12, 18).unwrap(),
        time: "09:30".to_string(),
        description: "Bring lab record".to_string(),
    }
}

#[cfg(test)]
mod record_tests {
    use super::*;

    #[tokio::test]
    async fn test_student_info_echoes_id() {
        let info = data_source()
            .student_info("AGS22BCDS001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.id, "AGS22BCDS001");
        assert!(!info.name.is_empty());
    }

    #[tokio::test]
    async fn test_schedule_rows_are_ordered_by_id() {
        let schedule = data_source().student_schedule("12345").await.unwrap();
        let ids: Vec<String> = schedule.iter().map(|s| s.id.clone()).collect();
        let expected: Vec<String> = (1..=30).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
        assert_eq!(schedule[0].course_id, "CS101");
        assert_eq!(schedule[29].day, "Friday");
    }

    #[tokio::test]
    async fn test_fixture_sizes() {
        let db = data_source();
        assert_eq!(db.student_assignments("12345").await.unwrap().len(), 2);
        assert_eq!(db.student_courses("12345").await.unwrap().len(), 2);
        assert_eq!(db.student_reminders("12345").await.unwrap().len(), 3);
        assert_eq!(db.study_materials(None).await.unwrap().len(), 30);
    }
}

#[cfg(test)]
mod location_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_filter_lists_everything() {
        match data_source().campus_locations(None).await.unwrap() {
            LocationLookup::All(list) => {
                assert_eq!(list.len(), 29);
                assert_eq!(list[0].id, "gate_main");
            }
            other => panic!("Expected all locations, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_filter_matches_case_insensitively() {
        match data_source().campus_locations(Some("LASSI")).await.unwrap() {
            LocationLookup::One(detail) => {
                assert_eq!(detail.name, "Lassi House");
                assert_eq!(detail.location_type, "food");
                assert_eq!(detail.nearby_places, vec!["CPRD"]);
            }
            other => panic!("Expected one location, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_filter_is_not_found() {
        let result = data_source().campus_locations(Some("observatory")).await.unwrap();
        assert_eq!(result, LocationLookup::NotFound);
    }
}

#[cfg(test)]
mod reminder_tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_follow_list_length() {
        let db = data_source();
        let first = db.add_reminder("12345", reminder("Lab viva")).await.unwrap();
        let second = db.add_reminder("12345", reminder("Library return")).await.unwrap();
        assert_eq!(first.id, "REM103");
        assert_eq!(second.id, "REM104");
        assert_eq!(db.student_reminders("12345").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let db = data_source();
        assert!(db.delete_reminder("2").await.unwrap());
        assert!(!db.delete_reminder("2").await.unwrap());

        let titles: Vec<String> = db
            .student_reminders("12345")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Study for CS101 Exam", "Office Hours with Dr. Smith"]);
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let result = data_source().add_reminder("12345", reminder("   ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_adds_get_distinct_ids() {
        let db = data_source();
        let handles: Vec<_> = (0..5)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.add_reminder("12345", reminder(&format!("Task {}", i)))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        assert_eq!(ids, vec!["REM103", "REM104", "REM105", "REM106", "REM107"]);
    }
}
