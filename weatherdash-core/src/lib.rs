//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - The derived-state pipeline (theme, unit formatting, time, comfort labels)
//! - Settings with an active/draft pair backed by a key-value store
//! - The weather session that owns the current snapshot and auto-refresh
//! - Configuration and the WeatherAPI.com provider
//!
//! It is used by `weatherdash-cli`, but can also be reused by other front ends.

pub mod comfort;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod refresh;
pub mod session;
pub mod settings;
pub mod store;
pub mod theme;
pub mod time;
pub mod units;
pub mod view;

pub use config::Config;
pub use error::{GeolocationError, PersistenceError, SettingsError, WeatherError};
pub use model::{Coordinates, WeatherQuery, WeatherSnapshot};
pub use provider::WeatherProvider;
pub use session::{SessionPhase, WeatherSession};
pub use settings::{SettingUpdate, Settings};
pub use store::{FileStore, KeyValueStore, MemoryStore, SettingsStore};
pub use view::{DerivedView, compute_derived_view};
