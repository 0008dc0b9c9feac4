use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::{info, warn};
use weather_core::{Config, OpenWeatherClient, Widget, config::API_KEY_ENV};

use crate::render::render_page;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecast from OpenWeather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather and the forecast for a city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Print the page as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities until Esc or Ctrl-C.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => {
                let widget = build_widget()?;
                if !widget.search(&city).await {
                    eprintln!("Please enter a city name.");
                    return Ok(());
                }
                print_page(&widget, json)
            }
            Command::Interactive => interactive(&build_widget()?).await,
        }
    }
}

/// Load config and build the widget. A missing key only warns; lookups will
/// then be rejected by the API and show up in the error panel.
fn build_widget() -> anyhow::Result<Widget> {
    let config = Config::load_with_env()?;

    if !config.has_api_key() {
        warn!(
            "No OpenWeather API key configured. Set {API_KEY_ENV} or run `weather configure`; \
             lookups will fail until then."
        );
    }

    let client = OpenWeatherClient::from_config(&config);
    Ok(Widget::new(client, config.icon_base_url))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(|input: &str| {
            Ok(if input.trim().is_empty() {
                inquire::validator::Validation::Invalid("API key must not be empty".into())
            } else {
                inquire::validator::Validation::Valid
            })
        })
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key);
    let path = config.save()?;
    info!(path = %path.display(), "saved configuration");
    println!("API key saved to {}", path.display());

    Ok(())
}

async fn interactive(widget: &Widget) -> anyhow::Result<()> {
    loop {
        let input = match Text::new("City:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to read city"),
        };

        // Blank input just re-prompts, like pressing search on an empty box.
        if widget.search(&input).await {
            print_page(widget, false)?;
        }
    }
}

fn print_page(widget: &Widget, json: bool) -> anyhow::Result<()> {
    let state = widget.page().snapshot();
    if json {
        let out = serde_json::to_string_pretty(&state).context("Failed to serialize page")?;
        println!("{out}");
    } else {
        print!("{}", render_page(&state));
    }
    Ok(())
}
