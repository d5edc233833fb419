//! Topic managers: the admission rules of each topic.

mod advertisement;
mod hello_world;
mod tokens;
mod uhrp;
mod utxo;

pub use advertisement::AdvertisementTopicManager;
pub use hello_world::HelloWorldTopicManager;
pub use tokens::TokenTopicManager;
pub use uhrp::UhrpTopicManager;
pub use utxo::UtxoTopicManager;

use crate::coordinator::{AdmissionReport, AdmittanceInstructions};
use overlay_consensus_core::{
    parse_envelope,
    tx::{PopulatedTransaction, TransactionOutpoint},
};
use overlay_core::warn;
use serde::Serialize;

pub const SHIP_TOPIC: &str = "tm_ship";
pub const SLAP_TOPIC: &str = "tm_slap";
pub const UHRP_TOPIC: &str = "tm_uhrp";
pub const HELLO_WORLD_TOPIC: &str = "tm_helloworld";
pub const TOKENS_TOPIC: &str = "tm_tokens";
pub const UTXO_TOPIC: &str = "tm_utxo";

pub const ALL_TOPICS: [&str; 6] = [SHIP_TOPIC, SLAP_TOPIC, UHRP_TOPIC, HELLO_WORLD_TOPIC, TOKENS_TOPIC, UTXO_TOPIC];

/// Describes a topic manager to the people running or using it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMetadata {
    pub name: &'static str,
    pub short_description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none", rename = "iconURL")]
    pub icon_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "informationURL")]
    pub information_url: Option<&'static str>,
}

/// Admission rules of one topic.
///
/// Only [`TopicManager::admit`] carries the rules. The envelope entry points parse first and
/// turn a parse failure into an empty result, and the needed-inputs hook asks for nothing
/// unless a manager overrides it.
pub trait TopicManager: Send + Sync {
    fn topic(&self) -> &'static str;

    /// Evaluates the outputs of `tx` given the inputs that spend coins already tracked
    /// by this topic.
    fn admit(&self, tx: &PopulatedTransaction, previous_coins: &[u32]) -> AdmissionReport;

    /// Parses `envelope` and evaluates its subject transaction.
    fn evaluate(&self, envelope: &[u8], previous_coins: &[u32]) -> AdmissionReport {
        match parse_envelope(envelope) {
            Ok(tx) => self.admit(&tx, previous_coins),
            Err(err) => {
                warn!("[{}] cannot parse transaction envelope: {}", self.topic(), err);
                AdmissionReport::parse_failure(err)
            }
        }
    }

    fn identify_admissible_outputs(&self, envelope: &[u8], previous_coins: &[u32]) -> AdmittanceInstructions {
        self.evaluate(envelope, previous_coins).instructions
    }

    /// Outpoints the topic needs the host to supply before `previous_coins` can be evaluated.
    fn identify_needed_inputs(&self, _tx: &PopulatedTransaction, _previous_coins: &[u32]) -> Vec<TransactionOutpoint> {
        vec![]
    }

    /// Markdown description of the admission rules.
    fn documentation(&self) -> &'static str;

    fn metadata(&self) -> TopicMetadata;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_json() {
        let metadata = TopicMetadata {
            name: "TokenTopicManager",
            short_description: "A topic manager for token transactions.",
            icon_url: Some("https://example.com/icon.png"),
            version: None,
            information_url: None,
        };
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            serde_json::json!({
                "name": "TokenTopicManager",
                "shortDescription": "A topic manager for token transactions.",
                "iconURL": "https://example.com/icon.png"
            })
        );
    }

    #[test]
    fn test_unparsable_envelope() {
        let managers: Vec<Box<dyn TopicManager>> = vec![
            Box::new(AdvertisementTopicManager::ship(Default::default())),
            Box::new(UhrpTopicManager::new(Default::default(), Default::default())),
            Box::new(HelloWorldTopicManager::new(Default::default())),
            Box::new(TokenTopicManager::new()),
            Box::new(UtxoTopicManager::new()),
        ];
        for manager in managers {
            for envelope in [&[][..], &[0x01, 0x00, 0xbe, 0xef][..], &[0xde, 0xad, 0xbe, 0xef, 0x00][..]] {
                let report = manager.evaluate(envelope, &[0]);
                assert!(report.instructions.is_empty(), "{} admitted from a broken envelope", manager.topic());
                assert!(report.parse_error.is_some());
                assert!(manager.identify_admissible_outputs(envelope, &[0]).is_empty());
            }
            assert!(ALL_TOPICS.contains(&manager.topic()));
            assert!(!manager.documentation().is_empty());
            assert!(!manager.metadata().name.is_empty());
        }
    }
}
