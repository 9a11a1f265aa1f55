use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weatherdash_core::{
    Config, FileStore, KeyValueStore, MemoryStore, SettingUpdate, SettingsStore, WeatherSession,
    geolocation::geolocator_from_config, provider::provider_from_config, settings::AutoRefresh,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Current weather in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and a default location.
    Configure,

    /// Show current conditions once.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Include heat index, dew point, precipitation and theme classes.
        #[arg(long)]
        details: bool,

        /// Print the derived view as JSON.
        #[arg(long, conflicts_with = "details")]
        json: bool,
    },

    /// Keep the dashboard on screen and refresh it until Ctrl-C.
    Watch {
        #[command(flatten)]
        location: LocationArgs,

        /// Refresh interval for this run: off, 5min, 15min or 30min.
        #[arg(long)]
        refresh: Option<AutoRefresh>,
    },

    /// Inspect or change saved preferences.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    /// e.g. `set tempUnit F` or `set autoRefresh 15min`.
    Set { key: String, value: String },
    Reset,
}

/// Which location to load. Without any of these the default location is used.
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// City name or any query WeatherAPI.com accepts.
    pub city: Option<String>,

    /// Use the current position (IP lookup or the configured position).
    #[arg(long, conflicts_with_all = ["city", "lat"])]
    pub here: bool,

    #[arg(long, requires = "lon", conflicts_with = "city", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, details, json } => show(location, details, json).await,
            Command::Watch { location, refresh } => watch(location, refresh).await,
            Command::Settings { action } => settings(action),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Free keys are available at https://www.weatherapi.com")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let mut store = settings_store(&config);
    let location = Text::new("Default location:")
        .with_default(&store.active().default_location)
        .prompt()
        .context("Failed to read default location")?;

    let location = location.trim();
    if !location.is_empty() {
        store.open_editing();
        store.update_draft(SettingUpdate::DefaultLocation(location.to_string()));
        store.commit();
    }
    config.display = store.active().clone();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: LocationArgs, details: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let session = load_session(&config, &location).await?;

    let Some(view) = session.visible_view() else {
        bail!("{}", session.error_message().unwrap_or("No weather data loaded"));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render::dashboard(view, details));
    }
    Ok(())
}

async fn watch(location: LocationArgs, refresh: Option<AutoRefresh>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut session = load_session(&config, &location).await?;
    if session.visible_view().is_none() {
        bail!("{}", session.error_message().unwrap_or("No weather data loaded"));
    }

    if let Some(refresh) = refresh {
        session.open_settings();
        session.update_draft(SettingUpdate::AutoRefresh(refresh));
        session.commit_settings();
    }

    print_status(&session);
    if !session.is_refresh_scheduled() {
        eprintln!("Auto-refresh is off. Pass --refresh 5min or set autoRefresh to keep watching.");
        return Ok(());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let tick = tokio::select! {
            _ = &mut ctrl_c => None,
            tick = session.next_refresh_tick() => tick,
        };
        let Some(tick) = tick else { break };

        session.handle_refresh_tick(tick).await;
        print_status(&session);
    }

    session.shutdown();
    Ok(())
}

fn settings(action: SettingsAction) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let mut store = settings_store(&config);

    match action {
        SettingsAction::Show => {
            print!("{}", render::settings_table(store.active()));
            return Ok(());
        }
        SettingsAction::Set { key, value } => {
            store.open_editing();
            store.update_draft_field(&key, &value)?;
            store.commit();
        }
        SettingsAction::Reset => store.reset_to_defaults(),
    }

    config.display = store.active().clone();
    config.save()?;
    print!("{}", render::settings_table(store.active()));
    Ok(())
}

async fn load_session(config: &Config, location: &LocationArgs) -> anyhow::Result<WeatherSession> {
    let provider = provider_from_config(config)?;
    let store = settings_store(config);

    let session = match (&location.city, location.here, location.lat.zip(location.lon)) {
        (_, true, _) => {
            let mut session = WeatherSession::new(provider, store);
            let locator = geolocator_from_config(config);
            session.request_current_location(locator.as_ref()).await;
            session
        }
        (_, _, Some((lat, lon))) => {
            let mut session = WeatherSession::new(provider, store);
            session.request_by_coordinates(lat, lon).await;
            session
        }
        (Some(city), _, _) => {
            let mut session = WeatherSession::new(provider, store);
            session.request_by_name(city).await;
            session
        }
        (None, false, None) => WeatherSession::open(provider, store).await,
    };
    Ok(session)
}

fn settings_store(config: &Config) -> SettingsStore {
    let storage: Box<dyn KeyValueStore> = match FileStore::open_default() {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!(error = %err, "No data directory; preferences will not persist");
            Box::new(MemoryStore::new())
        }
    };
    SettingsStore::load(storage, config.display.clone())
}

fn print_status(session: &WeatherSession) {
    match (session.visible_view(), session.error_message()) {
        (Some(view), _) => {
            println!("{}", render::dashboard(view, false));
        }
        (None, Some(message)) => eprintln!("{message}"),
        (None, None) => {}
    }
}
