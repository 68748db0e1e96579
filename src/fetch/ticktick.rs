use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone};
use reqwest::Client;
use serde::Deserialize;

use super::{FetchError, send_json, http_client};
use crate::core::event::CalendarEvent;
use crate::core::project::{Project, ProjectBoard, ProjectOutcome};
use crate::core::task::{Subtask, SubtaskPolicy, Task};
use crate::core::temporal::Timestamp;

const API_BASE: &str = "https://api.ticktick.com/open/v1";

/// A project as listed by `GET /project`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProject {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Body of `GET /project/{id}/data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProjectData {
    #[serde(default)]
    pub tasks: Vec<RawTask>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub title: Option<String>,
    pub due_date: Option<String>,
    pub is_all_day: Option<bool>,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: ItemStatus,
}

/// Checklist status. The Open API sends 0/1, older exports send booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ItemStatus {
    Flag(bool),
    Code(i64),
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self::Code(0)
    }
}

impl ItemStatus {
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Flag(done) => *done,
            Self::Code(code) => *code != 0,
        }
    }
}

/// Parse a TickTick `dueDate` such as `2026-10-19T07:00:00.000+0000`.
pub fn parse_due_date(s: &str) -> Result<Timestamp, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(Timestamp::Zoned(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Timestamp::Zoned(dt));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(Timestamp::Naive)
}

/// Turn one project's records into a `Project`.
///
/// Undated tasks are dropped. Records that cannot become a task are kept on
/// the project as skipped, so one bad record never hides the rest.
pub fn build_project(
    id: &str,
    name: &str,
    data: RawProjectData,
    now: &Timestamp,
    policy: &SubtaskPolicy,
) -> Project {
    let mut project = Project::new(id, name);

    for raw in data.tasks {
        let Some(due_str) = raw.due_date else {
            continue;
        };
        let Some(title) = raw.title else {
            log::warn!("{}: skipping task without a title", name);
            project.skip("<untitled>", "missing title");
            continue;
        };
        let due = match parse_due_date(&due_str) {
            Ok(due) => due,
            Err(e) => {
                log::warn!("{}: bad dueDate '{}' on '{}': {}", name, due_str, title, e);
                project.skip(title, format!("unparsable dueDate '{}': {}", due_str, e));
                continue;
            }
        };

        let subtasks = raw
            .items
            .into_iter()
            .map(|item| Subtask::new(item.title, item.status.is_complete()))
            .collect();

        match Task::new(&title, due, now, subtasks, policy) {
            Ok(task) => {
                log::debug!(
                    "{}: '{}' due {:?}, {} days",
                    name,
                    task.name(),
                    task.due_date(),
                    task.delta_days()
                );
                project.push(task);
            }
            Err(e) => {
                log::warn!("{}: skipping '{}': {}", name, title, e);
                project.skip(title, e.to_string());
            }
        }
    }

    log::debug!(
        "{}: {} dated tasks, {} skipped",
        name,
        project.tasks().len(),
        project.skipped().len()
    );
    project
}

/// Dated tasks of an events project that start inside `[now, now + lookahead]`.
///
/// Undated tasks count as starting now.
pub fn events_from_project(
    data: RawProjectData,
    now: DateTime<FixedOffset>,
    lookahead: Duration,
) -> Vec<CalendarEvent> {
    let horizon = now.checked_add_signed(lookahead);
    let mut events = Vec::new();

    for raw in data.tasks {
        let Some(title) = raw.title else {
            log::warn!("Skipping event without a title");
            continue;
        };
        let start = match raw.due_date.as_deref().map(parse_due_date) {
            None => now,
            Some(Ok(Timestamp::Zoned(dt))) => dt,
            Some(Ok(Timestamp::Naive(dt))) => match now.offset().from_local_datetime(&dt).single() {
                Some(dt) => dt,
                None => continue,
            },
            Some(Err(e)) => {
                log::warn!("Skipping event '{}': {}", title, e);
                continue;
            }
        };

        if start < now || horizon.is_some_and(|h| start > h) {
            continue;
        }

        let event = if raw.is_all_day.unwrap_or(true) {
            CalendarEvent::all_day(&title, start.with_timezone(now.offset()).date_naive())
        } else {
            CalendarEvent::timed(&title, start)
        };
        events.push(event);
    }

    events
}

/// TickTick Open API client.
#[derive(Clone)]
pub struct TickTickClient {
    base_url: String,
    token: String,
    http: Client,
}

impl TickTickClient {
    pub fn new(token: &str) -> Result<Self, FetchError> {
        Self::with_base_url(API_BASE, token)
    }

    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: http_client()?,
        })
    }

    pub async fn projects(&self) -> Result<Vec<RawProject>, FetchError> {
        let url = format!("{}/project", self.base_url);
        send_json(self.http.get(&url).bearer_auth(&self.token)).await
    }

    pub async fn project_data(&self, project_id: &str) -> Result<RawProjectData, FetchError> {
        let url = format!("{}/project/{}/data", self.base_url, project_id);
        send_json(self.http.get(&url).bearer_auth(&self.token)).await
    }

    async fn find_project(&self, name: &str) -> Result<Option<RawProject>, FetchError> {
        let projects = self.projects().await?;
        Ok(projects.into_iter().find(|p| p.name == name))
    }

    /// Fetch every named project and build the board for this run.
    ///
    /// Fails only when the project list itself cannot be fetched; per-project
    /// problems become outcomes on the board.
    pub async fn load_board(
        &self,
        names: &[String],
        now: &Timestamp,
        policy: &SubtaskPolicy,
    ) -> Result<ProjectBoard, FetchError> {
        let remote = self.projects().await?;
        log::info!("Fetched {} TickTick projects", remote.len());
        let remote = &remote;

        let lookups = names.iter().map(|name| async move {
            let Some(found) = remote.iter().find(|p| &p.name == name) else {
                log::warn!("TickTick project '{}' not found", name);
                return ProjectOutcome::NotFound { name: name.clone() };
            };
            match self.project_data(&found.id).await {
                Ok(data) => {
                    ProjectOutcome::Loaded(build_project(&found.id, name, data, now, policy))
                }
                Err(e) => {
                    log::warn!("Failed to fetch TickTick project '{}': {}", name, e);
                    ProjectOutcome::Failed {
                        name: name.clone(),
                        reason: e.to_string(),
                    }
                }
            }
        });

        Ok(ProjectBoard::new(futures::future::join_all(lookups).await))
    }

    /// Events kept as dated tasks in the project called `project_name`.
    /// A missing project yields no events.
    pub async fn load_events(
        &self,
        project_name: &str,
        now: DateTime<FixedOffset>,
        lookahead: Duration,
    ) -> Result<Vec<CalendarEvent>, FetchError> {
        let Some(project) = self.find_project(project_name).await? else {
            log::warn!("TickTick project '{}' not found", project_name);
            return Ok(Vec::new());
        };
        let data = self.project_data(&project.id).await?;
        Ok(events_from_project(data, now, lookahead))
    }
}
