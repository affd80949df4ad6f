use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, DisplayOptions, DisplayUnit, PlaceCandidate, SearchController, SearchOptions,
    SessionState, provider::openweather_from_config,
};
use inquire::{Password, PasswordDisplayMode, Select, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City search and current weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Search interactively: type a city, pick a suggestion, browse the result.
    Search {
        /// Initial temperature unit: "c" or "f".
        #[arg(long, default_value = "c")]
        unit: DisplayUnit,
    },

    /// Show weather for the first place matching a city name.
    Show {
        /// City name, at least three characters.
        city: String,

        /// Temperature unit: "c" or "f".
        #[arg(long, default_value = "c")]
        unit: DisplayUnit,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { unit } => search(unit).await,
            Command::Show { city, unit } => show(&city, unit).await,
        }
    }
}

/// Suggestion list entry for the select prompt.
struct Suggestion(PlaceCandidate);

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.label() {
            Some(label) => f.write_str(&label),
            None => write!(f, "{:.4}, {:.4}", self.0.latitude, self.0.longitude),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    ToggleUnit,
    SearchAnother,
    Quit,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::ToggleUnit => "Toggle unit",
            Action::SearchAnother => "Search another location",
            Action::Quit => "Quit",
        })
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    let path = config.save()?;
    println!("Saved API key to {}", path.display());

    Ok(())
}

fn too_short_message(min_query_len: usize) -> String {
    format!("City name must be at least {min_query_len} characters.")
}

fn build_controller(config: &Config, unit: DisplayUnit) -> anyhow::Result<SearchController> {
    let client = openweather_from_config(config)?;
    let mut controller =
        SearchController::new(client.clone(), client, SearchOptions::from(config));
    controller.set_unit(unit);
    Ok(controller)
}

async fn search(unit: DisplayUnit) -> anyhow::Result<()> {
    let config = Config::load()?;
    let options = DisplayOptions::from(&config);
    let mut controller = build_controller(&config, unit)?;
    let mut view = controller.subscribe();
    let placeholder = format!("Enter city name (minimum {} characters)", config.min_query_len);

    loop {
        let query = Text::new("City:")
            .with_placeholder(&placeholder)
            .with_initial_value(&controller.session().query)
            .prompt_skippable()
            .context("Failed to read city name")?;
        let Some(query) = query else { return Ok(()) };

        controller.input(query);
        controller.submit();
        if !controller.is_busy() {
            println!("{}", too_short_message(config.min_query_len));
            continue;
        }
        controller.settle().await;
        render::redraw(&mut view, &options);

        let candidates = controller.session().candidates().to_vec();
        if candidates.is_empty() {
            continue;
        }

        let choice = Select::new("Choose a place:", candidates.into_iter().map(Suggestion).collect())
            .prompt_skippable()
            .context("Failed to read selection")?;
        let Some(Suggestion(candidate)) = choice else { continue };

        controller.select(candidate);
        render::redraw(&mut view, &options);
        controller.settle().await;
        render::redraw(&mut view, &options);

        while controller.session().is_resolved() {
            let action = Select::new(
                "Next:",
                vec![Action::ToggleUnit, Action::SearchAnother, Action::Quit],
            )
            .prompt_skippable()
            .context("Failed to read action")?;

            match action {
                Some(Action::ToggleUnit) => controller.toggle_unit(),
                Some(Action::SearchAnother) => controller.search_another(),
                Some(Action::Quit) | None => return Ok(()),
            }
            render::redraw(&mut view, &options);
        }
    }
}

async fn show(city: &str, unit: DisplayUnit) -> anyhow::Result<()> {
    let config = Config::load()?;
    let options = DisplayOptions::from(&config);
    let mut controller = build_controller(&config, unit)?;

    controller.input(city);
    controller.submit();
    if !controller.is_busy() {
        bail!("{}", too_short_message(config.min_query_len));
    }
    controller.settle().await;

    let candidate = match &controller.session().state {
        SessionState::Suggesting(candidates) => candidates
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("No places match '{}'.", city.trim()))?,
        SessionState::Error(message) => bail!("{message}"),
        other => bail!("Unexpected search state: {other:?}"),
    };

    controller.select(candidate);
    controller.settle().await;

    if let Some(message) = controller.session().error() {
        bail!("{message}");
    }

    let model = controller
        .session()
        .display(chrono::Utc::now(), &chrono::Local, &options)
        .ok_or_else(|| anyhow!("Weather was not resolved"))?;
    print!("{}", render::weather_card(&model));

    Ok(())
}
