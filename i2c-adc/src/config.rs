//! Configuration for reading an ADC over I2C.
//!
//! Parses environment variables; command-line front ends override fields
//! individually.

use std::time::Duration;

use crate::hw_trait::adc::AdcChannel;
use crate::hw_trait::i2c::MAX_ADDRESS;
use crate::peripheral::ads1115::protocol::{CHANNEL_MUX, DEFAULT_ADDRESS};

/// Bus node used when `I2C_ADC_DEVICE` is unset.
pub const DEFAULT_DEVICE: &str = "/dev/i2c-1";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid I2C address '{0}': expected 0x00-0x7f")]
    InvalidAddress(String),

    #[error("Invalid channel '{0}': expected 0-3")]
    InvalidChannel(String),

    #[error("Invalid poll interval '{0}': expected milliseconds > 0")]
    InvalidInterval(String),
}

/// ADC reader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdcConfig {
    /// I2C bus device node.
    pub device: String,

    /// 7-bit address of the converter.
    pub address: u8,

    /// Channels sampled per round, in order.
    pub channels: Vec<AdcChannel>,

    /// Time between sampling rounds. `None` samples once.
    pub interval: Option<Duration>,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            address: DEFAULT_ADDRESS,
            channels: all_channels(),
            interval: None,
        }
    }
}

impl AdcConfig {
    /// Parse configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `I2C_ADC_DEVICE`: bus node (default: `/dev/i2c-1`)
    /// - `I2C_ADC_ADDRESS`: converter address, hex (`0x48`) or decimal (default: 0x48)
    /// - `I2C_ADC_CHANNELS`: comma-separated channels (default: `0,1,2,3`)
    /// - `I2C_ADC_INTERVAL_MS`: poll interval; unset samples once
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(device) = std::env::var("I2C_ADC_DEVICE") {
            config.device = device;
        }
        if let Ok(address) = std::env::var("I2C_ADC_ADDRESS") {
            config.address = parse_address(&address)?;
        }
        if let Ok(channels) = std::env::var("I2C_ADC_CHANNELS") {
            config.channels = parse_channels(&channels)?;
        }
        if let Ok(interval) = std::env::var("I2C_ADC_INTERVAL_MS") {
            config.interval = Some(parse_interval_ms(&interval)?);
        }

        Ok(config)
    }
}

/// Every channel the converter supports.
pub fn all_channels() -> Vec<AdcChannel> {
    (0..CHANNEL_MUX.len() as u8).map(AdcChannel).collect()
}

/// Parse a 7-bit address given as `0x`-prefixed hex or decimal.
pub fn parse_address(s: &str) -> Result<u8, ConfigError> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };

    match parsed {
        Ok(address) if address <= MAX_ADDRESS => Ok(address),
        _ => Err(ConfigError::InvalidAddress(s.to_string())),
    }
}

/// Parse a single channel index.
pub fn parse_channel(s: &str) -> Result<AdcChannel, ConfigError> {
    let s = s.trim();
    match s.parse::<u8>() {
        Ok(index) if usize::from(index) < CHANNEL_MUX.len() => Ok(AdcChannel(index)),
        _ => Err(ConfigError::InvalidChannel(s.to_string())),
    }
}

/// Parse a comma-separated channel list such as `0,2,3`.
pub fn parse_channels(s: &str) -> Result<Vec<AdcChannel>, ConfigError> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_channel)
        .collect()
}

/// Parse a poll interval in milliseconds; zero is rejected.
pub fn parse_interval_ms(s: &str) -> Result<Duration, ConfigError> {
    match s.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidInterval(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use test_case::test_case;

    const VARS: [&str; 4] = [
        "I2C_ADC_DEVICE",
        "I2C_ADC_ADDRESS",
        "I2C_ADC_CHANNELS",
        "I2C_ADC_INTERVAL_MS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test_case("0x48", 0x48)]
    #[test_case("0X4b", 0x4b)]
    #[test_case("72", 0x48)]
    #[test_case(" 0x7f ", 0x7f)]
    fn test_parse_address(input: &str, expected: u8) {
        assert_eq!(parse_address(input), Ok(expected));
    }

    #[test_case("0x80")]
    #[test_case("200")]
    #[test_case("0xzz")]
    #[test_case("")]
    fn test_parse_address_rejects(input: &str) {
        assert!(matches!(parse_address(input), Err(ConfigError::InvalidAddress(_))));
    }

    #[test]
    fn test_parse_channels() {
        assert_eq!(
            parse_channels("0, 2,3").unwrap(),
            vec![AdcChannel(0), AdcChannel(2), AdcChannel(3)]
        );
        assert_eq!(
            parse_channels("4"),
            Err(ConfigError::InvalidChannel("4".to_string()))
        );
    }

    #[test]
    fn test_parse_interval_ms() {
        assert_eq!(parse_interval_ms("250"), Ok(Duration::from_millis(250)));
        assert_eq!(
            parse_interval_ms("0"),
            Err(ConfigError::InvalidInterval("0".to_string()))
        );
        assert!(parse_interval_ms("-5").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = AdcConfig::from_env().unwrap();
        assert_eq!(config, AdcConfig::default());
        assert_eq!(config.device, "/dev/i2c-1");
        assert_eq!(config.address, 0x48);
        assert_eq!(config.channels.len(), 4);
        assert!(config.interval.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("I2C_ADC_DEVICE", "/dev/i2c-3");
        std::env::set_var("I2C_ADC_ADDRESS", "0x49");
        std::env::set_var("I2C_ADC_CHANNELS", "1,3");
        std::env::set_var("I2C_ADC_INTERVAL_MS", "500");

        let config = AdcConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.device, "/dev/i2c-3");
        assert_eq!(config.address, 0x49);
        assert_eq!(config.channels, vec![AdcChannel(1), AdcChannel(3)]);
        assert_eq!(config.interval, Some(Duration::from_millis(500)));
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        std::env::set_var("I2C_ADC_INTERVAL_MS", "0");
        assert!(matches!(
            AdcConfig::from_env(),
            Err(ConfigError::InvalidInterval(_))
        ));

        clear_env();
        std::env::set_var("I2C_ADC_ADDRESS", "0x90");
        assert!(matches!(
            AdcConfig::from_env(),
            Err(ConfigError::InvalidAddress(_))
        ));
        clear_env();
    }
}
