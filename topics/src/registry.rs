use crate::{
    config::AdmissionConfig,
    coordinator::{AdmissionReport, AdmittanceInstructions},
    errors::{ConfigError, ConfigResult},
    managers::{
        AdvertisementTopicManager, HELLO_WORLD_TOPIC, HelloWorldTopicManager, SHIP_TOPIC, SLAP_TOPIC, TOKENS_TOPIC, TokenTopicManager,
        TopicManager, UHRP_TOPIC, UTXO_TOPIC, UhrpTopicManager, UtxoTopicManager,
    },
};
use std::collections::BTreeMap;

/// The topic managers served, by topic name.
#[derive(Default)]
pub struct TopicRegistry {
    managers: BTreeMap<&'static str, Box<dyn TopicManager>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the managers of every topic `config` enables.
    pub fn from_config(config: &AdmissionConfig) -> ConfigResult<Self> {
        let mut registry = Self::new();
        for topic in config.enabled_topics.iter() {
            let manager: Box<dyn TopicManager> = match topic.as_str() {
                SHIP_TOPIC => Box::new(AdvertisementTopicManager::ship(config.verification)),
                SLAP_TOPIC => Box::new(AdvertisementTopicManager::slap(config.verification)),
                UHRP_TOPIC => Box::new(UhrpTopicManager::new(config.uhrp.clone(), config.verification)),
                HELLO_WORLD_TOPIC => Box::new(HelloWorldTopicManager::new(config.hello_world.clone())),
                TOKENS_TOPIC => Box::new(TokenTopicManager::new()),
                UTXO_TOPIC => Box::new(UtxoTopicManager::new()),
                unknown => return Err(ConfigError::UnknownTopic(unknown.to_string())),
            };
            registry.register(manager);
        }
        Ok(registry)
    }

    /// Registers `manager`, replacing any manager of the same topic.
    pub fn register(&mut self, manager: Box<dyn TopicManager>) {
        self.managers.insert(manager.topic(), manager);
    }

    pub fn get(&self, topic: &str) -> Option<&dyn TopicManager> {
        self.managers.get(topic).map(|manager| manager.as_ref())
    }

    pub fn topics(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.managers.keys().copied()
    }

    /// Evaluates `envelope` for `topic`, or returns `None` if the topic is not served.
    pub fn evaluate(&self, topic: &str, envelope: &[u8], previous_coins: &[u32]) -> Option<AdmissionReport> {
        Some(self.get(topic)?.evaluate(envelope, previous_coins))
    }

    pub fn identify_admissible_outputs(&self, topic: &str, envelope: &[u8], previous_coins: &[u32]) -> Option<AdmittanceInstructions> {
        Some(self.get(topic)?.identify_admissible_outputs(envelope, previous_coins))
    }
}
