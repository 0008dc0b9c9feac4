//! Core library for the `weather` lookup widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client for current conditions and the 5-day forecast
//! - Grouping of forecast samples into daily summaries
//! - The page model (panels, visibility, slot contents) and the search widget
//!
//! It is used by `weather-cli`, but can also be driven by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod openweather;
pub mod page;
pub mod widget;

pub use config::Config;
pub use error::WeatherError;
pub use forecast::{MAX_FORECAST_DAYS, aggregate_daily};
pub use model::{CityQuery, CurrentWeather, DailyAggregate, Descriptor, ForecastEntry};
pub use openweather::OpenWeatherClient;
pub use page::{
    ForecastCard, Page, PageState, Panel, PanelVisibility, VisibilityUpdate, WeatherCard,
};
pub use widget::Widget;
