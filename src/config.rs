use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::agenda::DisplayPolicy;
use crate::core::task::SubtaskPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("dayslip")
        .join("config.toml")
}

/// One block of the printed receipt.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Weather,
    Separator,
    Tasks,
    Events,
}

fn default_sections() -> Vec<SectionKind> {
    vec![
        SectionKind::Header,
        SectionKind::Weather,
        SectionKind::Separator,
        SectionKind::Tasks,
    ]
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DashConfig {
    pub debug_logging: bool,
    pub sections: Vec<SectionKind>,
    pub printer: PrinterConfig,
    pub weather: WeatherConfig,
    pub separator: SeparatorConfig,
    pub tasks: TasksConfig,
    pub events: EventsConfig,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            debug_logging: false,
            sections: default_sections(),
            printer: PrinterConfig::default(),
            weather: WeatherConfig::default(),
            separator: SeparatorConfig::default(),
            tasks: TasksConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Echo to stdout only; never touch the device.
    pub dry_run: bool,
    /// Raw ESC/POS character device, e.g. the usblp node.
    pub device: PathBuf,
    /// Columns per line in the default font.
    pub width: usize,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            device: PathBuf::from("/dev/usb/lp0"),
            width: 42,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Fahrenheit => "fahrenheit",
            Self::Celsius => "celsius",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone the forecast day is computed in.
    pub timezone: String,
    pub temperature_unit: TemperatureUnit,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            timezone: "America/Los_Angeles".into(),
            temperature_unit: TemperatureUnit::Fahrenheit,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SeparatorConfig {
    pub pattern: String,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            pattern: "-".into(),
        }
    }
}

/// Ten years; keeps `now + lookahead` well inside chrono's range.
const MAX_LOOKAHEAD_DAYS: i64 = 3660;

fn default_projects() -> Vec<String> {
    vec!["Out of House".into(), "House".into(), "Computer".into()]
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct TasksConfig {
    /// TickTick Open API token. Looked up in the keyring when unset.
    pub bearer_token: Option<String>,
    /// TickTick project names, printed in this order.
    pub projects: Vec<String>,
    pub subtask_max: usize,
    pub show_completed_subtasks: bool,
    /// Days overdue a task may be before it moves to the reschedule list.
    pub late_window_days: i64,
    /// Blank checkbox lines for tasks written in by hand.
    pub unfiled_slots: usize,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            projects: default_projects(),
            subtask_max: 5,
            show_completed_subtasks: false,
            late_window_days: 3,
            unfiled_slots: 3,
        }
    }
}

impl TasksConfig {
    pub fn subtask_policy(&self) -> SubtaskPolicy {
        SubtaskPolicy {
            show_completed: self.show_completed_subtasks,
            max_shown: self.subtask_max,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    pub google_calendar_id: String,
    /// Authorized-user token file; `None` disables Google Calendar.
    pub google_token_file: Option<PathBuf>,
    /// TickTick project whose dated tasks are treated as events.
    pub ticktick_project: Option<String>,
    pub lookahead_days: i64,
    pub max_results: u32,
    pub min_shown: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            google_calendar_id: "primary".into(),
            google_token_file: Some(PathBuf::from("token.json")),
            ticktick_project: Some("Event".into()),
            lookahead_days: 7,
            max_results: 50,
            min_shown: 4,
        }
    }
}

impl EventsConfig {
    pub fn display_policy(&self) -> DisplayPolicy {
        DisplayPolicy {
            min_shown: self.min_shown,
            lookahead: chrono::Duration::days(self.lookahead_days),
        }
    }
}

impl DashConfig {
    /// Load and validate. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_at(&content, path)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_at(content, Path::new("<inline>"))
    }

    fn parse_at(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.printer.width == 0 {
            return Err(ConfigError::Invalid("printer.width must be positive".into()));
        }
        if self.separator.pattern.is_empty() {
            return Err(ConfigError::Invalid("separator.pattern must not be empty".into()));
        }
        if self.tasks.late_window_days < 0 {
            return Err(ConfigError::Invalid("tasks.late_window_days must not be negative".into()));
        }
        if !(1..=MAX_LOOKAHEAD_DAYS).contains(&self.events.lookahead_days) {
            return Err(ConfigError::Invalid(format!(
                "events.lookahead_days must be between 1 and {}",
                MAX_LOOKAHEAD_DAYS
            )));
        }
        if !(-90.0..=90.0).contains(&self.weather.latitude) {
            return Err(ConfigError::Invalid(format!(
                "weather.latitude {} out of range",
                self.weather.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.weather.longitude) {
            return Err(ConfigError::Invalid(format!(
                "weather.longitude {} out of range",
                self.weather.longitude
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = DashConfig::parse("").unwrap();
        assert_eq!(config, DashConfig::default());
        assert_eq!(config.tasks.late_window_days, 3);
        assert_eq!(config.tasks.subtask_policy(), SubtaskPolicy::default());
        assert_eq!(config.events.display_policy(), DisplayPolicy::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = DashConfig::parse(
            r#"
sections = ["header", "tasks", "separator", "events"]

[tasks]
bearer_token = "abc"
projects = ["Work"]
show_completed_subtasks = true

[weather]
latitude = 47.6
longitude = -122.3
temperature_unit = "celsius"
"#,
        )
        .unwrap();
        assert_eq!(config.sections.len(), 4);
        assert_eq!(config.sections[3], SectionKind::Events);
        assert_eq!(config.tasks.bearer_token.as_deref(), Some("abc"));
        assert_eq!(config.tasks.projects, ["Work"]);
        assert_eq!(config.tasks.subtask_max, 5);
        assert!(config.tasks.subtask_policy().show_completed);
        assert_eq!(config.weather.temperature_unit.symbol(), "°C");
        assert_eq!(config.weather.timezone, "America/Los_Angeles");
        assert!(config.printer.dry_run);
    }

    #[test]
    fn rejects_unknown_section() {
        assert!(matches!(
            DashConfig::parse(r#"sections = ["horoscope"]"#),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            DashConfig::parse("[separator]\npattern = \"\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DashConfig::parse("[weather]\nlatitude = 123.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DashConfig::parse("[events]\nlookahead_days = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DashConfig::parse("[events]\nlookahead_days = 200000000"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(DashConfig::parse("[events]\nlookahead_days = 3660").is_ok());
        assert!(matches!(
            DashConfig::parse("[tasks]\nlate_window_days = -1"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = DashConfig::load(Path::new("/nonexistent/dayslip.toml")).unwrap();
        assert_eq!(config, DashConfig::default());
    }
}
