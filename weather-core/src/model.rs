use chrono::{NaiveDateTime, Weekday};

/// A trimmed, non-empty city name typed into the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    /// Returns `None` for empty or whitespace-only input; no lookup is made for those.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short condition text plus the OpenWeather icon code (e.g. `"04d"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: String,
    pub descriptor: Descriptor,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Wall-clock time of the sample as reported by the API.
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub descriptor: Descriptor,
}

/// Summary of all forecast samples sharing a weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyAggregate {
    pub weekday: Weekday,
    pub min_c: i32,
    pub max_c: i32,
    /// Sample at index `samples / 2` of the day, in arrival order.
    pub representative: Descriptor,
    pub samples: usize,
}

/// Rounds to the nearest integer with halves going up (`-2.5` -> `-2`, `2.5` -> `3`).
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
