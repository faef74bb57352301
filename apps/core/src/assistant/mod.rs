//! # Assistant
//!
//! Routes one student question to an answer. The order of checks is:
//! fast paths, session check, `!` commands, campus navigation, keyword classifier,
//! then the language model.
//!
//! Every public entry point returns a displayable string; failures of the data source
//! or the language model are logged and turned into a fixed apology.

pub mod format;

use crate::actors::LlmActor;
use crate::brain::commands::{self, HELP_MESSAGE};
use crate::brain::{Category, DayFilter, ExtractedInfo, QueryClassifier, QueryType};
use crate::campus::{navigation, LocationStore};
use crate::database::{LocationLookup, StudentDataSource};
use crate::error::AppError;
use crate::models::SessionContext;
use chrono::{Local, NaiveDate};
use format::{format_results, QueryData};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, info, instrument};

pub const APOLOGY_MESSAGE: &str = "I'm sorry, I encountered an error while processing your request. Please try again or ask in a different way.";

pub const DIRECT_COMMAND_ERROR: &str = "I encountered an error while trying to fetch data from the database. Please try a different query format.";

const UNKNOWN_COMMAND_MESSAGE: &str = "I couldn't determine what specific college data you're looking for. Try using !schedule, !assignments, !courses, !reminders, or !location.";

const LOGGED_OUT_PREFIX: &str =
    "As a college assistant, I can only access your personal data when you're logged in. ";

/// Classifier confidence above which data is returned without asking the model.
const HIGH_CONFIDENCE: f64 = 0.7;

const ASSIGNMENT_OVERRIDE_WORDS: [&str; 4] = ["assignment", "homework", "due date", "project"];

static TODAY_CLASSES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)today['’]?s\s+class(es)?|class(es)?\s+today|class(es)?\s+for\s+today")
        .expect("Invalid regex: today's classes pattern")
});

static ASSIGNMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)assignment(s)?|homework|due|task(s)?|project(s)?")
        .expect("Invalid regex: assignment pattern")
});

/// Source of "today" for day-relative schedule questions.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Query router over a language model and a student data source.
pub struct AssistantService<L, D>
where
    L: LlmActor + Send + Sync + 'static,
    D: StudentDataSource + Send + Sync + 'static,
{
    llm_actor: Arc<L>,
    data_source: Arc<D>,
    locations: Arc<LocationStore>,
    classifier: QueryClassifier,
    clock: Clock,
}

impl<L, D> AssistantService<L, D>
where
    L: LlmActor + Send + Sync + 'static,
    D: StudentDataSource + Send + Sync + 'static,
{
    pub fn new(llm_actor: Arc<L>, data_source: Arc<D>, locations: Arc<LocationStore>) -> Self {
        Self {
            llm_actor,
            data_source,
            locations,
            classifier: QueryClassifier::new(),
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Replaces the wall clock, mainly for tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Student ID used for sessions that carry none.
    pub fn with_demo_student_id(mut self, demo_student_id: impl Into<String>) -> Self {
        self.classifier = QueryClassifier::with_demo_student_id(demo_student_id);
        self
    }

    /// Answers one question for the given session.
    #[instrument(skip(self, session), fields(authenticated = session.is_authenticated))]
    pub async fn process_query(&self, session: &SessionContext, query: &str) -> String {
        info!("Processing query");
        match self.route(session, query).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Error processing query: {}", e);
                APOLOGY_MESSAGE.to_string()
            }
        }
    }

    async fn route(&self, session: &SessionContext, query: &str) -> Result<String, AppError> {
        let today = (self.clock)();
        let student_id = session.student_id_or(self.classifier.demo_student_id());

        if TODAY_CLASSES_PATTERN.is_match(query) && !query.to_lowercase().contains("assignment") {
            debug!("Fast path: today's classes");
            let data = self.fetch_category(Category::Schedule, student_id).await?;
            return Ok(format_results(
                data.as_ref(),
                Category::Schedule,
                Some(DayFilter::Today),
                today,
            ));
        }

        if ASSIGNMENT_PATTERN.is_match(query) {
            debug!("Fast path: assignments");
            let data = self.fetch_assignments(student_id, None).await?;
            return Ok(format_results(data.as_ref(), Category::Assignments, None, today));
        }

        if !session.is_authenticated {
            return self
                .llm_actor
                .generate(format!("{}{}", LOGGED_OUT_PREFIX, query))
                .await;
        }

        if let Some(body) = commands::command_body(query) {
            return Ok(self.direct_command(body, student_id, today).await);
        }

        if navigation::is_navigation_query(query) {
            if let Some(answer) = navigation::answer(&self.locations, query) {
                return Ok(answer);
            }
        }

        let classification = self.classifier.classify(query, session);
        if let (QueryType::Database, Some(category)) =
            (classification.query_type, classification.category)
        {
            let info = classification.extracted_info.unwrap_or_default();
            if let Some(answer) = self
                .answer_from_data(query, category, classification.confidence, &info, today)
                .await?
            {
                return Ok(answer);
            }
        }

        self.llm_actor.generate(query.to_string()).await
    }

    /// Answers a classified database query, or `None` when there is no data to show.
    async fn answer_from_data(
        &self,
        query: &str,
        category: Category,
        confidence: f64,
        info: &ExtractedInfo,
        today: NaiveDate,
    ) -> Result<Option<String>, AppError> {
        let lower = query.to_lowercase();
        let student_id = info.student_id.as_str();

        if category == Category::Assignments
            || ASSIGNMENT_OVERRIDE_WORDS.iter().any(|w| lower.contains(w))
        {
            let data = self
                .fetch_assignments(student_id, info.assignment_id.as_deref())
                .await?;
            return Ok(Some(format_results(
                data.as_ref(),
                Category::Assignments,
                None,
                today,
            )));
        }

        let data = match category {
            Category::Location => {
                let name = info
                    .gate_name
                    .as_ref()
                    .map(|gate| format!("gate {}", gate))
                    .or_else(|| info.building_name.clone());
                self.fetch_location(name.as_deref()).await?
            }
            _ => self.fetch_category(category, student_id).await?,
        };

        let Some(data) = data else {
            debug!(%category, "No data for category, deferring to language model");
            return Ok(None);
        };

        let day_filter = match category {
            Category::Schedule => info.day_filter,
            _ => None,
        };

        if confidence > HIGH_CONFIDENCE {
            return Ok(Some(format_results(Some(&data), category, day_filter, today)));
        }

        let llm_answer = self.llm_actor.generate(query.to_string()).await?;
        if category == Category::Location {
            return Ok(Some(format_results(Some(&data), category, None, today)));
        }

        Ok(Some(format!(
            "{}\n\nAdditional information:\n{}",
            format_results(Some(&data), category, day_filter, today),
            llm_answer
        )))
    }

    async fn direct_command(&self, body: &str, student_id: &str, today: NaiveDate) -> String {
        info!("Processing direct database command: {}", body);
        match self.run_direct_command(body, student_id, today).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Error processing direct database command: {}", e);
                DIRECT_COMMAND_ERROR.to_string()
            }
        }
    }

    async fn run_direct_command(
        &self,
        body: &str,
        student_id: &str,
        today: NaiveDate,
    ) -> Result<String, AppError> {
        let Some(category) = commands::command_category(body) else {
            let answer = self
                .llm_actor
                .generate(commands::categorization_prompt(body))
                .await?;
            let Some(category) = commands::category_from_answer(&answer) else {
                return Ok(HELP_MESSAGE.to_string());
            };
            debug!(%category, "Direct command categorized by language model");
            let data = self.fetch_category(category, student_id).await?;
            let day_filter = match category {
                Category::Schedule => commands::simple_day_filter(body),
                _ => None,
            };
            return Ok(format_results(data.as_ref(), category, day_filter, today));
        };

        let (data, day_filter) = match category {
            Category::Assignments => {
                let number = commands::assignment_number(body);
                (self.fetch_assignments(student_id, number.as_deref()).await?, None)
            }
            Category::Schedule => (
                self.fetch_category(category, student_id).await?,
                commands::simple_day_filter(body),
            ),
            Category::Courses | Category::Reminders => {
                (self.fetch_category(category, student_id).await?, None)
            }
            Category::Location => {
                let place = commands::specific_location(body);
                (self.fetch_location(place).await?, None)
            }
            Category::Grades | Category::Unknown => {
                return Ok(UNKNOWN_COMMAND_MESSAGE.to_string());
            }
        };

        Ok(format_results(data.as_ref(), category, day_filter, today))
    }

    /// Fetches the student's full record set for a category. Locations are not filtered.
    async fn fetch_category(
        &self,
        category: Category,
        student_id: &str,
    ) -> Result<Option<QueryData>, AppError> {
        let data = match category {
            Category::Schedule => Some(QueryData::Schedule(
                self.data_source.student_schedule(student_id).await?,
            )),
            Category::Assignments => return self.fetch_assignments(student_id, None).await,
            Category::Courses => Some(QueryData::Courses(
                self.data_source.student_courses(student_id).await?,
            )),
            Category::Reminders => Some(QueryData::Reminders(
                self.data_source.student_reminders(student_id).await?,
            )),
            Category::Location => return self.fetch_location(None).await,
            Category::Grades | Category::Unknown => None,
        };
        Ok(data)
    }

    async fn fetch_assignments(
        &self,
        student_id: &str,
        assignment_id: Option<&str>,
    ) -> Result<Option<QueryData>, AppError> {
        match assignment_id {
            Some(id) => Ok(self
                .data_source
                .assignment_details(id)
                .await?
                .map(QueryData::Assignment)),
            None => Ok(Some(QueryData::Assignments(
                self.data_source.student_assignments(student_id).await?,
            ))),
        }
    }

    async fn fetch_location(&self, name: Option<&str>) -> Result<Option<QueryData>, AppError> {
        Ok(match self.data_source.campus_locations(name).await? {
            LocationLookup::All(list) => Some(QueryData::Locations(list)),
            LocationLookup::One(detail) => Some(QueryData::Location(detail)),
            LocationLookup::NotFound => None,
        })
    }
}
