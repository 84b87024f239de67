//! Accessory configuration, static information and persisted state keys.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DummySensorError, ValidationError};
use crate::id::AccessoryId;
use crate::sensor::{SensorKind, UnknownSensorKind};

/// Manufacturer reported in the accessory information service.
pub const MANUFACTURER: &str = "Homebridge";

/// Model reported in the accessory information service.
pub const MODEL: &str = "Dummy Sensor";

/// Firmware revision reported in the accessory information service.
pub const FIRMWARE_REVISION: &str = env!("CARGO_PKG_VERSION");

/// Configuration of one accessory, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryConfig {
    pub name: String,
    /// Requested sensor kind. Unknown values fall back to contact.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Delay before the sensor follows the switch turning on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<DelaySetting>,
}

impl AccessoryConfig {
    /// Create a builder for constructing an [`AccessoryConfig`].
    #[must_use]
    pub fn builder() -> AccessoryConfigBuilder {
        AccessoryConfigBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DummySensorError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), DummySensorError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Stable identifier of the accessory.
    #[must_use]
    pub fn id(&self) -> AccessoryId {
        AccessoryId::from_name(&self.name)
    }

    /// Parse the configured sensor kind; a missing value means contact.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownSensorKind`] when the value is not a known kind, so
    /// callers can report it before falling back.
    pub fn sensor_kind(&self) -> Result<SensorKind, UnknownSensorKind> {
        self.kind
            .as_deref()
            .map_or(Ok(SensorKind::default()), str::parse)
    }

    /// Configured on-delay, zero when absent or invalid.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay.as_ref().map_or(0, DelaySetting::millis))
    }

    /// Keys under which this accessory's state is persisted.
    #[must_use]
    pub fn state_keys(&self) -> StateKeys {
        StateKeys::for_name(&self.name)
    }
}

/// Raw `delay` value, accepted as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DelaySetting {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DelaySetting {
    /// Milliseconds this setting stands for.
    ///
    /// Strings are read like an integer parse: leading whitespace is skipped,
    /// an optional sign and the leading run of digits are kept, anything after
    /// is ignored. Fractions truncate. Negative, non-finite or unparsable
    /// values yield 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn millis(&self) -> u64 {
        match self {
            Self::Integer(value) => u64::try_from(*value).unwrap_or(0),
            Self::Float(value) if value.is_finite() && *value > 0.0 => value.trunc() as u64,
            Self::Float(_) => 0,
            Self::Text(text) => parse_leading_integer(text),
        }
    }
}

impl From<u64> for DelaySetting {
    fn from(value: u64) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for DelaySetting {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

fn parse_leading_integer(text: &str) -> u64 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Step-by-step builder for [`AccessoryConfig`].
#[derive(Debug, Default)]
pub struct AccessoryConfigBuilder {
    name: Option<String>,
    kind: Option<String>,
    delay: Option<DelaySetting>,
}

impl AccessoryConfigBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: impl Into<DelaySetting>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    /// Consume the builder, validate, and return an [`AccessoryConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`DummySensorError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<AccessoryConfig, DummySensorError> {
        let config = AccessoryConfig {
            name: self.name.unwrap_or_default(),
            kind: self.kind,
            delay: self.delay,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Store keys holding an accessory's two booleans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKeys {
    pub switch: String,
    pub sensor: String,
}

impl StateKeys {
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        Self {
            switch: format!("{name}-switch"),
            sensor: format!("{name}-sensor"),
        }
    }
}

/// Static metadata of the accessory information service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInfo {
    pub manufacturer: String,
    pub model: String,
    pub firmware_revision: String,
    pub serial_number: String,
}

impl AccessoryInfo {
    /// Information for the accessory called `name`.
    ///
    /// The serial number is `Dummy-` followed by the name with every
    /// whitespace character replaced by `-`.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        let serial: String = name
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect();
        Self {
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            firmware_revision: FIRMWARE_REVISION.to_string(),
            serial_number: format!("Dummy-{serial}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_config_with_defaults() {
        let config = AccessoryConfig::builder().name("Door").build().unwrap();
        assert_eq!(config.sensor_kind().unwrap(), SensorKind::Contact);
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn should_reject_empty_name() {
        let result = AccessoryConfig::builder().name("  ").build();
        assert!(matches!(
            result,
            Err(DummySensorError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_reject_missing_name() {
        assert!(AccessoryConfig::builder().build().is_err());
    }

    #[test]
    fn should_report_unknown_kind() {
        let config = AccessoryConfig::builder()
            .name("Door")
            .kind("smoke")
            .build()
            .unwrap();
        assert!(config.sensor_kind().is_err());
    }

    #[test]
    fn should_parse_integer_delay() {
        assert_eq!(DelaySetting::Integer(1000).millis(), 1000);
        assert_eq!(DelaySetting::Integer(-5).millis(), 0);
    }

    #[test]
    fn should_parse_string_delay_like_an_integer_parse() {
        assert_eq!(DelaySetting::from("1000").millis(), 1000);
        assert_eq!(DelaySetting::from("  250ms").millis(), 250);
        assert_eq!(DelaySetting::from("+40").millis(), 40);
        assert_eq!(DelaySetting::from("12.9").millis(), 12);
    }

    #[test]
    fn should_coerce_invalid_string_delay_to_zero() {
        assert_eq!(DelaySetting::from("soon").millis(), 0);
        assert_eq!(DelaySetting::from("").millis(), 0);
        assert_eq!(DelaySetting::from("-300").millis(), 0);
    }

    #[test]
    fn should_truncate_float_delay() {
        assert_eq!(DelaySetting::Float(1500.9).millis(), 1500);
        assert_eq!(DelaySetting::Float(0.5).millis(), 0);
        assert_eq!(DelaySetting::Float(-2.0).millis(), 0);
        assert_eq!(DelaySetting::Float(f64::NAN).millis(), 0);
    }

    #[test]
    fn should_deserialize_delay_as_number_or_string() {
        let config: AccessoryConfig =
            serde_json::from_str(r#"{"name": "Door", "type": "leak", "delay": "1000"}"#).unwrap();
        assert_eq!(config.delay(), Duration::from_millis(1000));
        assert_eq!(config.sensor_kind().unwrap(), SensorKind::Leak);

        let config: AccessoryConfig =
            serde_json::from_str(r#"{"name": "Door", "delay": 250}"#).unwrap();
        assert_eq!(config.delay(), Duration::from_millis(250));
    }

    #[test]
    fn should_deserialize_from_toml() {
        let config: AccessoryConfig = toml::from_str(
            r#"
            name = "Back Door"
            type = "motion"
            delay = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.name, "Back Door");
        assert_eq!(config.sensor_kind().unwrap(), SensorKind::Motion);
        assert_eq!(config.delay(), Duration::from_millis(500));
    }

    #[test]
    fn should_namespace_state_keys_by_name() {
        let keys = StateKeys::for_name("Door");
        assert_eq!(keys.switch, "Door-switch");
        assert_eq!(keys.sensor, "Door-sensor");
    }

    #[test]
    fn should_derive_serial_number_from_name() {
        let info = AccessoryInfo::for_name("Front  Door\tLeft");
        assert_eq!(info.serial_number, "Dummy-Front--Door-Left");
        assert_eq!(info.manufacturer, "Homebridge");
        assert_eq!(info.model, "Dummy Sensor");
        assert_eq!(info.firmware_revision, FIRMWARE_REVISION);
    }
}
