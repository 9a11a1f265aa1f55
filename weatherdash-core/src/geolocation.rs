//! Sources for "where am I".

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::{Config, GeolocationMode},
    error::GeolocationError,
    model::Coordinates,
    provider::weatherapi::WeatherApiProvider,
};

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Position resolved from the public IP through WeatherAPI.com.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    provider: WeatherApiProvider,
}

impl IpGeolocator {
    pub fn new(provider: WeatherApiProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.provider.locate_by_ip().await
    }
}

/// A position the user configured by hand.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// Location access turned off in config.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}

/// Pick the locator the config asks for. IP lookup needs an API key and
/// reports `Unavailable` without one.
pub fn geolocator_from_config(config: &Config) -> Box<dyn Geolocator> {
    match config.geolocation {
        GeolocationMode::Off => Box::new(DisabledGeolocator),
        GeolocationMode::Fixed(position) => Box::new(FixedGeolocator(position)),
        GeolocationMode::Ip => match config.api_key() {
            Some(key) => {
                let provider = WeatherApiProvider::new(key).with_base_url(config.base_url());
                match provider.clone().with_timeout(config.timeout()) {
                    Ok(provider) => Box::new(IpGeolocator::new(provider)),
                    Err(err) => {
                        tracing::warn!(error = %err, "Could not build HTTP client for IP lookup");
                        Box::new(IpGeolocator::new(provider))
                    }
                }
            }
            None => Box::new(UnavailableGeolocator),
        },
    }
}

/// No way to determine a position on this system.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeolocator;

#[async_trait]
impl Geolocator for UnavailableGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}
