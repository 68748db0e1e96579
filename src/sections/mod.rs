pub mod events;
pub mod header;
pub mod separator;
pub mod tasks;
pub mod weather;

use chrono::{DateTime, FixedOffset};
use std::io;

use crate::config::{DashConfig, EventsConfig, SectionKind, TasksConfig, WeatherConfig};
use crate::core::agenda::Agenda;
use crate::core::event::CalendarEvent;
use crate::core::project::ProjectBoard;
use crate::core::temporal::Timestamp;
use crate::fetch::google::GoogleCalendarClient;
use crate::fetch::keyring::{self, TICKTICK_ACCOUNT};
use crate::fetch::ticktick::TickTickClient;
use crate::fetch::weather::{Forecast, WeatherClient};
use crate::fetch::FetchError;
use crate::print::Printer;

use events::EventsSection;
use header::Header;
use separator::Separator;
use tasks::TasksSection;
use weather::WeatherSection;

/// One block of the receipt.
pub trait Section {
    fn print(&self, p: &mut dyn Printer) -> io::Result<()>;
}

/// The configured sections, with all remote data already fetched.
pub struct Dashboard {
    sections: Vec<Box<dyn Section>>,
}

impl Dashboard {
    /// Fetch everything the configured sections need, concurrently, then
    /// assemble them. `now` is the single reference time for the whole run.
    pub async fn build(config: &DashConfig, now: DateTime<FixedOffset>) -> Self {
        let wants = |kind| config.sections.contains(&kind);

        let (forecast, board, agenda) = tokio::join!(
            async {
                if wants(SectionKind::Weather) {
                    Some(load_weather(&config.weather).await)
                } else {
                    None
                }
            },
            async {
                if wants(SectionKind::Tasks) {
                    Some(load_board(&config.tasks, now).await)
                } else {
                    None
                }
            },
            async {
                if wants(SectionKind::Events) {
                    Some(load_agenda(&config.tasks, &config.events, now).await)
                } else {
                    None
                }
            },
        );

        let mut sections: Vec<Box<dyn Section>> = Vec::new();
        for kind in &config.sections {
            let section: Box<dyn Section> = match kind {
                SectionKind::Header => Box::new(Header::new(now.date_naive())),
                SectionKind::Separator => {
                    Box::new(Separator::new(config.separator.pattern.clone()))
                }
                SectionKind::Weather => Box::new(WeatherSection::new(
                    forecast.clone().unwrap_or_else(|| Err("not fetched".into())),
                    config.weather.temperature_unit,
                )),
                SectionKind::Tasks => Box::new(TasksSection::new(
                    board.clone().unwrap_or_else(|| Err("not fetched".into())),
                    config.tasks.late_window_days,
                    config.tasks.unfiled_slots,
                )),
                SectionKind::Events => Box::new(EventsSection::new(
                    agenda.clone().unwrap_or_default(),
                    now,
                    config.events.display_policy(),
                )),
            };
            sections.push(section);
        }

        Self { sections }
    }

    pub fn print(&self, p: &mut dyn Printer) -> io::Result<()> {
        for section in &self.sections {
            section.print(p)?;
        }
        p.cut()
    }
}

async fn ticktick_token(config: &TasksConfig) -> Result<String, String> {
    if let Some(token) = config.bearer_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    match keyring::load_token(TICKTICK_ACCOUNT).await {
        Ok(Some(token)) => Ok(token),
        Ok(None) => Err("TickTick config missing bearer_token".into()),
        Err(e) => {
            log::warn!("Keyring lookup failed: {}", e);
            Err("TickTick config missing bearer_token".into())
        }
    }
}

async fn load_weather(config: &WeatherConfig) -> Result<Forecast, String> {
    let result = match WeatherClient::new() {
        Ok(client) => client.today(config).await,
        Err(e) => Err(e),
    };
    result.map_err(|e| {
        log::error!("Failed to fetch weather: {}", e);
        e.to_string()
    })
}

async fn load_board(
    config: &TasksConfig,
    now: DateTime<FixedOffset>,
) -> Result<ProjectBoard, String> {
    let token = ticktick_token(config).await?;
    let client = TickTickClient::new(&token).map_err(|e| e.to_string())?;
    let board = client
        .load_board(&config.projects, &Timestamp::Zoned(now), &config.subtask_policy())
        .await
        .map_err(|e| {
            log::error!("Failed to fetch TickTick projects: {}", e);
            format!("TickTick error: {}", e)
        })?;

    let not_found = board.not_found();
    if !not_found.is_empty() {
        log::warn!("Projects not found in TickTick: {}", not_found.join(", "));
    }
    for (name, reason) in board.failures() {
        log::warn!("Project {} unavailable: {}", name, reason);
    }
    for project in board.projects() {
        for skipped in project.skipped() {
            log::warn!("{}: skipped '{}' ({})", project.name, skipped.title, skipped.reason);
        }
    }
    log::info!(
        "Loaded {} of {} TickTick projects",
        board.projects().count(),
        config.projects.len()
    );
    Ok(board)
}

fn source_events(
    source: &str,
    result: Result<Vec<CalendarEvent>, FetchError>,
) -> Vec<CalendarEvent> {
    match result {
        Ok(events) => {
            log::info!("Fetched {} {} events", events.len(), source);
            events
        }
        Err(e) => {
            log::warn!("Failed to fetch {} events: {}", source, e);
            Vec::new()
        }
    }
}

/// Google Calendar first, then the TickTick events project. A source that
/// is not configured or fails contributes nothing.
async fn load_agenda(
    tasks: &TasksConfig,
    config: &EventsConfig,
    now: DateTime<FixedOffset>,
) -> Agenda {
    let lookahead = chrono::Duration::days(config.lookahead_days);

    let google = async {
        let Some(token_file) = config.google_token_file.as_deref() else {
            return Vec::new();
        };
        let result = match GoogleCalendarClient::new(token_file) {
            Ok(client) => {
                client
                    .upcoming_events(&config.google_calendar_id, now, lookahead, config.max_results)
                    .await
            }
            Err(e) => Err(e),
        };
        source_events("Google Calendar", result)
    };

    let ticktick = async {
        let Some(project) = config.ticktick_project.as_deref() else {
            return Vec::new();
        };
        let token = match ticktick_token(tasks).await {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Skipping TickTick events: {}", e);
                return Vec::new();
            }
        };
        let result = match TickTickClient::new(&token) {
            Ok(client) => client.load_events(project, now, lookahead).await,
            Err(e) => Err(e),
        };
        source_events("TickTick", result)
    };

    let (google, ticktick) = tokio::join!(google, ticktick);
    Agenda::merge([google, ticktick])
}


#[cfg(test)]
mod tests {
    use super::testing::LinePrinter;
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn offline_sections_build_and_cut() {
        let config = DashConfig {
            sections: vec![SectionKind::Header, SectionKind::Separator, SectionKind::Header],
            ..DashConfig::default()
        };
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 1, 9, 0, 0)
            .unwrap();

        let dashboard = Dashboard::build(&config, now).await;
        let mut p = LinePrinter::default();
        dashboard.print(&mut p).unwrap();

        let rule = "-".repeat(42);
        assert_eq!(p.lines, ["October 1st 2026", rule.as_str(), "October 1st 2026"]);
        assert_eq!(p.cuts, 1);
    }
}
