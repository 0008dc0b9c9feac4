//! The widget's UI surface: panel visibility plus the data slots rendered into
//! each panel.
//!
//! A [`Page`] is created once and shared by reference with both lookups of a
//! search. It holds structured data only; turning it into text is left to the
//! caller.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Weekday;
use serde::Serialize;

use crate::model::{CurrentWeather, DailyAggregate, round_half_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Panel {
    Weather,
    Forecast,
    Error,
    Loading,
}

impl Panel {
    pub const fn all() -> &'static [Panel] {
        &[Panel::Weather, Panel::Forecast, Panel::Error, Panel::Loading]
    }
}

/// Which panels are currently shown. Everything starts hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PanelVisibility {
    pub weather: bool,
    pub forecast: bool,
    pub error: bool,
    pub loading: bool,
}

impl PanelVisibility {
    pub fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Weather => self.weather,
            Panel::Forecast => self.forecast,
            Panel::Error => self.error,
            Panel::Loading => self.loading,
        }
    }

    /// Applies only the flags set in `update`; the others keep their value.
    #[must_use]
    pub fn apply(self, update: VisibilityUpdate) -> Self {
        Self {
            weather: update.weather.unwrap_or(self.weather),
            forecast: update.forecast.unwrap_or(self.forecast),
            error: update.error.unwrap_or(self.error),
            loading: update.loading.unwrap_or(self.loading),
        }
    }
}

/// A partial set of visibility flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityUpdate {
    pub weather: Option<bool>,
    pub forecast: Option<bool>,
    pub error: Option<bool>,
    pub loading: Option<bool>,
}

impl VisibilityUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weather(mut self, visible: bool) -> Self {
        self.weather = Some(visible);
        self
    }

    pub fn forecast(mut self, visible: bool) -> Self {
        self.forecast = Some(visible);
        self
    }

    pub fn error(mut self, visible: bool) -> Self {
        self.error = Some(visible);
        self
    }

    pub fn loading(mut self, visible: bool) -> Self {
        self.loading = Some(visible);
        self
    }

    pub fn set(self, panel: Panel, visible: bool) -> Self {
        match panel {
            Panel::Weather => self.weather(visible),
            Panel::Forecast => self.forecast(visible),
            Panel::Error => self.error(visible),
            Panel::Loading => self.loading(visible),
        }
    }
}

/// Contents of the current-weather panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCard {
    /// `"Name, CC"`.
    pub city: String,
    pub description: String,
    pub temperature_c: i32,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

impl From<&CurrentWeather> for WeatherCard {
    fn from(w: &CurrentWeather) -> Self {
        Self {
            city: format!("{}, {}", w.location_name, w.country),
            description: w.descriptor.description.clone(),
            temperature_c: round_half_up(w.temperature_c),
            humidity_pct: w.humidity_pct,
            wind_speed_mps: w.wind_speed_mps,
        }
    }
}

/// One day in the forecast panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastCard {
    pub weekday: Weekday,
    pub icon: String,
    pub icon_url: String,
    pub min_c: i32,
    pub max_c: i32,
    pub description: String,
}

impl ForecastCard {
    pub fn from_aggregate(day: &DailyAggregate, icon_base_url: &str) -> Self {
        let icon = day.representative.icon.clone();
        Self {
            weekday: day.weekday,
            icon_url: format!("{}/{icon}@2x.png", icon_base_url.trim_end_matches('/')),
            icon,
            min_c: day.min_c,
            max_c: day.max_c,
            description: day.representative.description.clone(),
        }
    }

    /// `"min°C - max°C"`.
    pub fn range_label(&self) -> String {
        format!("{}°C - {}°C", self.min_c, self.max_c)
    }
}

/// Snapshot of everything on the page.
///
/// Each lookup owns one error slot. The error panel stays up while either
/// slot is filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageState {
    pub visibility: PanelVisibility,
    pub weather: Option<WeatherCard>,
    pub forecast: Vec<ForecastCard>,
    pub weather_error: Option<String>,
    pub forecast_error: Option<String>,
}

impl PageState {
    /// Messages behind the error panel, weather lookup first.
    pub fn error_messages(&self) -> impl Iterator<Item = &str> {
        self.weather_error
            .as_deref()
            .into_iter()
            .chain(self.forecast_error.as_deref())
    }
}

#[derive(Debug, Default)]
pub struct Page {
    state: Mutex<PageState>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        // Writers never panic while holding the lock, but a poisoned page is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn toggle_visibility(&self, update: VisibilityUpdate) {
        let mut state = self.state();
        state.visibility = state.visibility.apply(update);
    }

    pub fn visibility(&self) -> PanelVisibility {
        self.state().visibility
    }

    /// Fill the weather panel and drop the weather lookup's error.
    pub fn show_weather(&self, card: WeatherCard) {
        let mut state = self.state();
        state.weather = Some(card);
        state.weather_error = None;
        let error = state.forecast_error.is_some();
        state.visibility = state
            .visibility
            .apply(VisibilityUpdate::new().weather(true).error(error));
    }

    /// Empty and hide the weather panel, and show `message` in the error panel.
    pub fn weather_failed(&self, message: impl Into<String>) {
        let mut state = self.state();
        state.weather = None;
        state.weather_error = Some(message.into());
        state.visibility = state
            .visibility
            .apply(VisibilityUpdate::new().weather(false).error(true));
    }

    pub fn clear_forecast(&self) {
        self.state().forecast.clear();
    }

    /// Fill the forecast panel and drop the forecast lookup's error.
    pub fn show_forecast(&self, cards: Vec<ForecastCard>) {
        let mut state = self.state();
        state.forecast = cards;
        state.forecast_error = None;
        let error = state.weather_error.is_some();
        state.visibility = state
            .visibility
            .apply(VisibilityUpdate::new().forecast(true).error(error));
    }

    /// Empty and hide the forecast panel, and show `message` in the error panel.
    pub fn forecast_failed(&self, message: impl Into<String>) {
        let mut state = self.state();
        state.forecast.clear();
        state.forecast_error = Some(message.into());
        state.visibility = state
            .visibility
            .apply(VisibilityUpdate::new().forecast(false).error(true));
    }

    pub fn snapshot(&self) -> PageState {
        self.state().clone()
    }
}
