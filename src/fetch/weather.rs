use reqwest::Client;
use serde::Deserialize;

use super::{FetchError, send_json, http_client};
use crate::config::WeatherConfig;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Today's forecast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub temp_max: f64,
    pub temp_min: f64,
    pub weather_code: u16,
}

#[derive(Debug, Deserialize)]
pub struct RawForecast {
    daily: RawDaily,
}

#[derive(Debug, Deserialize)]
struct RawDaily {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    weather_code: Vec<Option<u16>>,
}

impl RawForecast {
    /// The first day of the daily series.
    pub fn today(&self) -> Result<Forecast, FetchError> {
        let first = |series: &[Option<f64>], what| {
            series.first().copied().flatten().ok_or(FetchError::Missing(what))
        };
        Ok(Forecast {
            temp_max: first(&self.daily.temperature_2m_max, "temperature_2m_max")?,
            temp_min: first(&self.daily.temperature_2m_min, "temperature_2m_min")?,
            weather_code: self
                .daily
                .weather_code
                .first()
                .copied()
                .flatten()
                .ok_or(FetchError::Missing("weather_code"))?,
        })
    }
}

/// WMO weather interpretation codes as used by Open-Meteo.
pub fn describe_wmo(code: u16) -> Option<&'static str> {
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return None,
    };
    Some(text)
}

pub struct WeatherClient {
    base_url: String,
    http: Client,
}

impl WeatherClient {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            base_url: FORECAST_URL.to_string(),
            http: http_client()?,
        })
    }

    pub async fn today(&self, config: &WeatherConfig) -> Result<Forecast, FetchError> {
        let query = [
            ("latitude", config.latitude.to_string()),
            ("longitude", config.longitude.to_string()),
            (
                "daily",
                "temperature_2m_max,temperature_2m_min,weather_code".to_string(),
            ),
            ("timezone", config.timezone.clone()),
            ("forecast_days", "1".to_string()),
            (
                "temperature_unit",
                config.temperature_unit.as_query().to_string(),
            ),
        ];
        let raw: RawForecast = send_json(self.http.get(&self.base_url).query(&query)).await?;
        let forecast = raw.today()?;
        log::debug!("Forecast: {:?}", forecast);
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_day() {
        let raw: RawForecast = serde_json::from_str(
            r#"{"latitude": 47.6, "daily": {
                "time": ["2026-10-19"],
                "temperature_2m_max": [61.3],
                "temperature_2m_min": [48.0],
                "weather_code": [61]
            }}"#,
        )
        .unwrap();
        let forecast = raw.today().unwrap();
        assert_eq!(forecast.temp_max, 61.3);
        assert_eq!(forecast.temp_min, 48.0);
        assert_eq!(describe_wmo(forecast.weather_code), Some("Slight rain"));
    }

    #[test]
    fn missing_values_are_errors() {
        let raw: RawForecast = serde_json::from_str(
            r#"{"daily": {
                "temperature_2m_max": [null],
                "temperature_2m_min": [40.0],
                "weather_code": [3]
            }}"#,
        )
        .unwrap();
        assert!(matches!(raw.today(), Err(FetchError::Missing("temperature_2m_max"))));
    }

    #[test]
    fn unknown_wmo_code() {
        assert_eq!(describe_wmo(4), None);
        assert_eq!(describe_wmo(99), Some("Thunderstorm with heavy hail"));
    }
}
