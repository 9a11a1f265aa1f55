use crate::{
    Config, WeatherQuery, WeatherSnapshot, error::WeatherError,
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No WeatherAPI.com key configured.\n\
                 Hint: run `weatherdash configure` or set WEATHERAPI_KEY."
        )
    })?;

    let provider = WeatherApiProvider::new(api_key.to_owned())
        .with_base_url(config.base_url())
        .with_timeout(config.timeout())?;

    Ok(Box::new(provider))
}
