use chrono::{DateTime, Duration, FixedOffset, NaiveDate, SecondsFormat, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{FetchError, send_json, http_client};
use crate::core::event::CalendarEvent;

const CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
// Refresh a little early so the token does not expire mid-request.
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// An authorized-user token file as written by Google's auth libraries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorizedUser {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub expiry: Option<String>,
    /// Scopes, account and anything else, written back untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AuthorizedUser {
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        let content = std::fs::read_to_string(path).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), FetchError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// True when there is no access token or it expires within the margin.
    /// A token without an expiry is trusted.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_none() {
            return true;
        }
        let Some(expiry) = self.expiry.as_deref() else {
            return false;
        };
        match DateTime::parse_from_rfc3339(expiry) {
            Ok(expiry) => expiry.with_timezone(&Utc) <= now + Duration::seconds(EXPIRY_MARGIN_SECS),
            Err(e) => {
                log::debug!("Unreadable token expiry '{}': {}", expiry, e);
                true
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawEventPage {
    #[serde(default)]
    pub items: Vec<RawGoogleEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGoogleEvent {
    pub summary: Option<String>,
    #[serde(default)]
    pub start: RawEventTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

/// Convert one API event. `start.date` marks an all-day event; an event with
/// neither start field is placed at `now`.
pub fn event_from_google(
    raw: &RawGoogleEvent,
    now: DateTime<FixedOffset>,
) -> Option<CalendarEvent> {
    let name = raw.summary.as_deref().unwrap_or("Untitled Event");

    if let Some(date_time) = raw.start.date_time.as_deref() {
        return match DateTime::parse_from_rfc3339(date_time) {
            Ok(start) => Some(CalendarEvent::timed(name, start)),
            Err(e) => {
                log::warn!("Error parsing Google event '{}': {}", name, e);
                None
            }
        };
    }

    if let Some(date) = raw.start.date.as_deref() {
        return match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(date) => Some(CalendarEvent::all_day(name, date)),
            Err(e) => {
                log::warn!("Error parsing Google event '{}': {}", name, e);
                None
            }
        };
    }

    Some(CalendarEvent::timed(name, now))
}

/// Read-only Google Calendar client backed by a refreshable token file.
pub struct GoogleCalendarClient {
    base_url: String,
    token_file: PathBuf,
    http: Client,
}

impl GoogleCalendarClient {
    pub fn new(token_file: &Path) -> Result<Self, FetchError> {
        Ok(Self {
            base_url: CALENDAR_API.to_string(),
            token_file: token_file.to_path_buf(),
            http: http_client()?,
        })
    }

    async fn access_token(&self) -> Result<String, FetchError> {
        let mut user = AuthorizedUser::load(&self.token_file)?;
        if user.is_expired(Utc::now()) {
            log::info!("Refreshing Google access token");
            self.refresh(&mut user).await?;
            if let Err(e) = user.save(&self.token_file) {
                log::warn!("Failed to save refreshed Google token: {}", e);
            }
        }
        user.token
            .ok_or_else(|| FetchError::Credentials("token file has no access token".into()))
    }

    async fn refresh(&self, user: &mut AuthorizedUser) -> Result<(), FetchError> {
        let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
            user.refresh_token.as_deref(),
            user.client_id.as_deref(),
            user.client_secret.as_deref(),
        ) else {
            return Err(FetchError::Credentials(
                "Google token expired and cannot be refreshed; re-authorize".into(),
            ));
        };

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        let resp: TokenResponse = send_json(self.http.post(&user.token_uri).form(&params)).await?;

        user.token = Some(resp.access_token);
        user.expiry = resp.expires_in.map(|secs| {
            (Utc::now() + Duration::seconds(secs)).to_rfc3339_opts(SecondsFormat::Micros, true)
        });
        Ok(())
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| FetchError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(self.base_url.clone()))?
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }

    /// Single (expanded) events starting between `now` and `now + lookahead`.
    pub async fn upcoming_events(
        &self,
        calendar_id: &str,
        now: DateTime<FixedOffset>,
        lookahead: Duration,
        max_results: u32,
    ) -> Result<Vec<CalendarEvent>, FetchError> {
        let time_max = now
            .checked_add_signed(lookahead)
            .ok_or(FetchError::TimeRange)?;
        let token = self.access_token().await?;
        let url = self.events_url(calendar_id)?;
        let query = [
            ("timeMin", now.to_rfc3339()),
            ("timeMax", time_max.to_rfc3339()),
            ("maxResults", max_results.to_string()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];

        let page: RawEventPage =
            send_json(self.http.get(url).bearer_auth(token).query(&query)).await?;
        Ok(page
            .items
            .iter()
            .filter_map(|raw| event_from_google(raw, now))
            .collect())
    }
}
