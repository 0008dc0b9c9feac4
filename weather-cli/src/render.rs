use std::fmt::Write as _;

use weather_core::PageState;

/// Render the visible panels of a page as plain text.
///
/// The loading indicator is transient and never printed; a finished search
/// has already hidden it.
pub fn render_page(state: &PageState) -> String {
    let mut out = String::new();
    let vis = state.visibility;

    if vis.error {
        let mut messages = state.error_messages().peekable();
        if messages.peek().is_none() {
            let _ = writeln!(out, "Error: Something went wrong");
        }
        for msg in messages {
            let _ = writeln!(out, "Error: {msg}");
        }
    }

    if let Some(card) = state.weather.as_ref().filter(|_| vis.weather) {
        let _ = writeln!(out, "{}", card.city);
        let _ = writeln!(out, "  {}", card.description);
        let _ = writeln!(out, "  Temperature: {}°C", card.temperature_c);
        let _ = writeln!(out, "  Humidity:    {}%", card.humidity_pct);
        let _ = writeln!(out, "  Wind:        {} m/s", card.wind_speed_mps);
    }

    if vis.forecast && !state.forecast.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "Forecast");
        let width = state
            .forecast
            .iter()
            .map(|c| c.range_label().chars().count())
            .max()
            .unwrap_or(0);
        for card in &state.forecast {
            let _ = writeln!(
                out,
                "  {}  [{}]  {:<width$}  {}",
                card.weekday,
                card.icon,
                card.range_label(),
                card.description,
            );
        }
    }

    out
}
