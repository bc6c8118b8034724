use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::{BookingError, BookingResult};
use crate::time::TimeOfDay;

#[derive(Debug, Clone)]
pub struct Config {
    /// Step of the start/end time pickers.
    pub slot_minutes: u16,
    /// Pre-selected start in an empty booking form.
    pub default_start: TimeOfDay,
    /// Pre-selected end in an empty booking form.
    pub default_end: TimeOfDay,
    /// Storage folder for uploaded catalog images.
    pub image_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slot_minutes: 30,
            default_start: TimeOfDay::from_minutes(9 * 60).unwrap_or(TimeOfDay::MIDNIGHT),
            default_end: TimeOfDay::from_minutes(10 * 60).unwrap_or(TimeOfDay::MIDNIGHT),
            image_prefix: "images".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> BookingResult<Self> {
        let config = Self {
            slot_minutes: try_load("BOOKERY_SLOT_MINUTES", "30")?,
            default_start: try_load("BOOKERY_DEFAULT_START", "09:00")?,
            default_end: try_load("BOOKERY_DEFAULT_END", "10:00")?,
            image_prefix: try_load::<String>("BOOKERY_IMAGE_PREFIX", "images")?
                .trim_matches('/')
                .to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BookingResult<()> {
        if self.slot_minutes == 0 || self.slot_minutes >= 24 * 60 {
            return Err(BookingError::Config(format!(
                "slot length {} is outside 1..1440 minutes",
                self.slot_minutes
            )));
        }
        if self.default_end <= self.default_start {
            return Err(BookingError::Config(format!(
                "default end {} is not after default start {}",
                self.default_end, self.default_start
            )));
        }
        if self.image_prefix.is_empty() {
            return Err(BookingError::Config("image prefix is empty".into()));
        }
        Ok(())
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> BookingResult<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            BookingError::Config(format!("{key}: {e}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_start.to_string(), "09:00");
        assert_eq!(config.default_end.to_string(), "10:00");
    }

    #[test]
    fn loads_defaults_when_unset() {
        // None of the BOOKERY_* variables are set in the test environment.
        let config = Config::load().unwrap();
        assert_eq!(config.slot_minutes, 30);
        assert_eq!(config.image_prefix, "images");
    }

    #[test]
    fn reversed_defaults_are_rejected() {
        let config = Config {
            default_start: "10:00".parse().unwrap(),
            default_end: "09:00".parse().unwrap(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(BookingError::Config(_))));
    }

    #[test]
    fn zero_slot_is_rejected() {
        let config = Config {
            slot_minutes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unparseable_value_is_a_config_error() {
        let err = try_load::<u16>("BOOKERY_TEST_UNSET_KEY", "thirty").unwrap_err();
        assert!(matches!(err, BookingError::Config(_)));
    }
}
