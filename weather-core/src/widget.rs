use chrono::{Local, NaiveDate};
use tracing::{error, info, instrument};

use crate::{
    forecast::aggregate_daily,
    model::CityQuery,
    openweather::OpenWeatherClient,
    page::{ForecastCard, Page, VisibilityUpdate, WeatherCard},
};

/// The search action: reads a city, runs both lookups, writes results to the page.
///
/// Nothing is cancelled; a slower earlier search can land after a newer one
/// and overwrite its results.
#[derive(Debug)]
pub struct Widget {
    client: OpenWeatherClient,
    page: Page,
    icon_base_url: String,
    /// Pinned "today" for forecast grouping; `None` reads the local clock per lookup.
    today: Option<NaiveDate>,
}

impl Widget {
    pub fn new(client: OpenWeatherClient, icon_base_url: impl Into<String>) -> Self {
        Self {
            client,
            page: Page::new(),
            icon_base_url: icon_base_url.into(),
            today: None,
        }
    }

    /// Group forecasts against `today` instead of the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Runs both lookups concurrently for a non-blank `input`.
    ///
    /// Returns `false` without touching the network or the page when the input
    /// is empty or whitespace only.
    pub async fn search(&self, input: &str) -> bool {
        let Some(city) = CityQuery::parse(input) else {
            info!("empty city input, nothing to look up");
            return false;
        };

        tokio::join!(self.fetch_weather(&city), self.fetch_forecast(&city));
        true
    }

    #[instrument(skip_all, fields(city = %city))]
    pub async fn fetch_weather(&self, city: &CityQuery) {
        self.page
            .toggle_visibility(VisibilityUpdate::new().loading(true));

        match self.client.current_weather(city.as_str()).await {
            Ok(current) => self.page.show_weather(WeatherCard::from(&current)),
            Err(e) => {
                error!(error = %e, "weather lookup failed");
                self.page.weather_failed(e.message());
            }
        }

        self.page
            .toggle_visibility(VisibilityUpdate::new().loading(false));
    }

    #[instrument(skip_all, fields(city = %city))]
    pub async fn fetch_forecast(&self, city: &CityQuery) {
        self.page.clear_forecast();
        self.page
            .toggle_visibility(VisibilityUpdate::new().loading(true));

        match self.client.forecast(city.as_str()).await {
            Ok(entries) => {
                let cards = aggregate_daily(&entries, self.today())
                    .iter()
                    .map(|day| ForecastCard::from_aggregate(day, &self.icon_base_url))
                    .collect();
                self.page.show_forecast(cards);
            }
            Err(e) => {
                error!(error = %e, "forecast lookup failed");
                self.page.forecast_failed(e.message());
            }
        }

        self.page
            .toggle_visibility(VisibilityUpdate::new().loading(false));
    }
}
