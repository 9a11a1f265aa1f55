use thiserror::Error;

/// Failures of the `getCurrentPosition` collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location access was denied")]
    PermissionDenied,
    #[error("location service is unavailable")]
    Unavailable,
    #[error("location lookup timed out")]
    Timeout,
}

impl GeolocationError {
    /// Message shown to the user when a position cannot be obtained.
    pub fn user_message(&self) -> &'static str {
        match self {
            GeolocationError::Unavailable => "Geolocation is not supported on this system.",
            GeolocationError::PermissionDenied | GeolocationError::Timeout => {
                "Unable to retrieve your location. Please check your location settings."
            }
        }
    }
}

/// Durable storage could not be read or written.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contents are invalid: {0}")]
    Format(String),
}

/// Errors produced while obtaining a weather snapshot.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request failed, returned a non-success status, or returned unparsable data.
    #[error("network error: {0}")]
    Network(String),
    /// The provider could not resolve the requested location.
    #[error("location not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Network(err.to_string())
    }
}

/// Rejected string-keyed settings update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for setting '{key}'. Expected one of: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geolocation_messages_distinguish_unsupported() {
        assert!(GeolocationError::Unavailable.user_message().contains("not supported"));
        assert!(GeolocationError::Timeout.user_message().starts_with("Unable to retrieve"));
        assert_eq!(
            GeolocationError::PermissionDenied.user_message(),
            GeolocationError::Timeout.user_message()
        );
    }

    #[test]
    fn geolocation_converts_into_weather_error() {
        let err: WeatherError = GeolocationError::Timeout.into();
        assert!(matches!(err, WeatherError::Geolocation(GeolocationError::Timeout)));
        assert_eq!(err.to_string(), "location lookup timed out");
    }
}
