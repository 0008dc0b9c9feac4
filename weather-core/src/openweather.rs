use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::{
    Config,
    error::WeatherError,
    model::{CurrentWeather, Descriptor, ForecastEntry},
};

const CITY_NOT_FOUND: &str = "City not found";
const FORECAST_NOT_AVAILABLE: &str = "Forecast not available";

/// Layout of `dt_txt` in forecast samples, e.g. `2024-05-16 12:00:00`.
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// HTTP client for the OpenWeather 2.5 current-weather and 5-day forecast endpoints.
///
/// Units are always metric.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Config::default().base_url,
            http: Client::new(),
        }
    }

    /// Point the client at another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// A missing key is not an error here; OpenWeather rejects the calls instead.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_key().unwrap_or_default())
            .with_base_url(config.base_url.as_str())
    }

    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let body = self
            .get("weather", city)
            .await
            .map_err(|msg| WeatherError::Lookup(msg.unwrap_or_else(|| CITY_NOT_FOUND.into())))?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Lookup(format!("Failed to parse OpenWeather current JSON: {e}"))
        })?;

        let descriptor = parsed
            .weather
            .into_iter()
            .next()
            .map(Descriptor::from)
            .ok_or_else(|| {
                WeatherError::Lookup("Response contained no weather conditions".into())
            })?;

        Ok(CurrentWeather {
            location_name: parsed.name,
            country: parsed.sys.country,
            descriptor,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
        })
    }

    pub async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self
            .get("forecast", city)
            .await
            .map_err(|msg| {
                WeatherError::Forecast(msg.unwrap_or_else(|| FORECAST_NOT_AVAILABLE.into()))
            })?;

        let parsed: OwForecastResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Forecast(format!("Failed to parse OpenWeather forecast JSON: {e}"))
        })?;

        parsed
            .list
            .into_iter()
            .map(ForecastEntry::try_from)
            .collect()
    }

    /// Issue the GET and return the body of a successful response.
    ///
    /// On failure the error carries the API's own message when one could be
    /// extracted, `None` otherwise so the caller can pick its fallback text.
    async fn get(&self, endpoint: &str, city: &str) -> Result<String, Option<String>> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, city, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                Some(format!(
                    "Failed to send request to OpenWeather ({endpoint}): {e}"
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            Some(format!("Failed to read OpenWeather {endpoint} response body: {e}"))
        })?;
        trace!(%status, body = %truncate_body(&body), "OpenWeather response");

        if !status.is_success() {
            debug!(%status, "OpenWeather request failed");
            return Err(api_error_message(&body));
        }

        Ok(body)
    }
}

/// The `message` field of an OpenWeather error body, if there is a usable one.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

impl From<OwWeather> for Descriptor {
    fn from(w: OwWeather) -> Self {
        Descriptor {
            description: w.description,
            icon: w.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let time = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT)
            .map_err(|e| {
                WeatherError::Forecast(format!(
                    "Invalid forecast timestamp '{}': {e}",
                    entry.dt_txt
                ))
            })?;

        let descriptor = entry
            .weather
            .into_iter()
            .next()
            .map(Descriptor::from)
            .ok_or_else(|| {
                WeatherError::Forecast(format!(
                    "Forecast sample at {} has no weather conditions",
                    entry.dt_txt
                ))
            })?;

        Ok(ForecastEntry {
            time,
            temperature_c: entry.main.temp,
            descriptor,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
