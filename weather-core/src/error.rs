use thiserror::Error;

/// Failure of one of the two OpenWeather lookups.
///
/// Each fetch fails independently; the widget catches these at the fetch
/// boundary and only ever shows them in the error panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// Current-weather lookup failed (non-success status, transport or body error).
    #[error("Weather lookup failed: {0}")]
    Lookup(String),

    /// Forecast lookup failed.
    #[error("Forecast lookup failed: {0}")]
    Forecast(String),
}

impl WeatherError {
    /// The bare message, without the lookup-kind prefix.
    pub fn message(&self) -> &str {
        match self {
            WeatherError::Lookup(msg) | WeatherError::Forecast(msg) => msg,
        }
    }
}
