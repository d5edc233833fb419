use crate::{
    errors::{ConfigError, ConfigResult},
    managers::ALL_TOPICS,
};
use overlay_keys::VerificationMode;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Well-known base58 address every UHRP token names in field 0.
pub const UHRP_PROTOCOL_ADDRESS: &str = "1UHRPYnMHPuQ5Tgb3AF8JXqwKkmZVy5hG";
pub const MIN_EXPIRY_TIME: u64 = 1_600_000_000;
pub const MAX_EXPIRY_TIME: u64 = 100_000_000_000;
pub const MAX_CONTENT_LENGTH: u64 = 11_000_000_000;
pub const MIN_MESSAGE_LENGTH: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UhrpConfig {
    pub protocol_address: String,
    pub min_expiry_time: u64,
    pub max_expiry_time: u64,
    pub max_content_length: u64,
}

impl Default for UhrpConfig {
    fn default() -> Self {
        Self {
            protocol_address: UHRP_PROTOCOL_ADDRESS.to_string(),
            min_expiry_time: MIN_EXPIRY_TIME,
            max_expiry_time: MAX_EXPIRY_TIME,
            max_content_length: MAX_CONTENT_LENGTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelloWorldConfig {
    /// Minimum message length, in characters.
    pub min_message_length: usize,
}

impl Default for HelloWorldConfig {
    fn default() -> Self {
        Self { min_message_length: MIN_MESSAGE_LENGTH }
    }
}

/// Settings of the admission rules, usually read from a TOML file.
///
/// Every key is optional; missing keys take the protocol defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Topics the registry serves.
    pub enabled_topics: Vec<String>,
    pub verification: VerificationMode,
    pub uhrp: UhrpConfig,
    pub hello_world: HelloWorldConfig,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            enabled_topics: ALL_TOPICS.iter().map(|topic| topic.to_string()).collect(),
            verification: VerificationMode::default(),
            uhrp: UhrpConfig::default(),
            hello_world: HelloWorldConfig::default(),
        }
    }
}

impl AdmissionConfig {
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(topic) = self.enabled_topics.iter().find(|topic| !ALL_TOPICS.contains(&topic.as_str())) {
            return Err(ConfigError::UnknownTopic(topic.clone()));
        }
        if self.uhrp.min_expiry_time > self.uhrp.max_expiry_time {
            return Err(ConfigError::InvalidRange {
                name: "uhrp expiry time",
                min: self.uhrp.min_expiry_time,
                max: self.uhrp.max_expiry_time,
            });
        }
        Ok(())
    }
}
