use super::{TopicManager, TopicMetadata, UTXO_TOPIC};
use crate::{
    coordinator::{AdmissionReport, CoinRejection, scan_outputs},
    errors::AdmissionError,
};
use overlay_consensus_core::tx::PopulatedTransaction;

const DOCUMENTATION: &str = "# Utxo

There are no rules for admittance: all outputs are admitted and all previous coins are retained, so the topic tracks the spend status of every output it sees.
";

/// Tracks every output, with no admission rules.
#[derive(Default)]
pub struct UtxoTopicManager;

impl UtxoTopicManager {
    pub fn new() -> Self {
        Self
    }
}

impl TopicManager for UtxoTopicManager {
    fn topic(&self) -> &'static str {
        UTXO_TOPIC
    }

    fn admit(&self, tx: &PopulatedTransaction, previous_coins: &[u32]) -> AdmissionReport {
        let scan = scan_outputs(self.topic(), tx, |_, _| Ok(None));
        let (coins_to_retain, missing): (Vec<u32>, Vec<u32>) =
            previous_coins.iter().partition(|&&index| (index as usize) < tx.tx.inputs.len());
        let skipped_coins = missing.into_iter().map(|index| CoinRejection { index, error: AdmissionError::MissingInput(index) }).collect();
        AdmissionReport::new(self.topic(), tx, scan, coins_to_retain, skipped_coins)
    }

    fn documentation(&self) -> &'static str {
        DOCUMENTATION
    }

    fn metadata(&self) -> TopicMetadata {
        TopicMetadata {
            name: "UtxoTopicManager",
            short_description: "A topic manager for any transaction.",
            icon_url: Some("https://example.com/icon.png"),
            version: Some("1.0.0"),
            information_url: Some("https://example.com/info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_consensus_core::tx::{ScriptPublicKey, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput};

    #[test]
    fn test_admit_everything() {
        let inputs = (0..2).map(|i| TransactionInput::new(TransactionOutpoint::new(TransactionId::from_bytes([1; 32]), i), vec![], 0)).collect();
        let outputs = vec![TransactionOutput::new(1, ScriptPublicKey::new(vec![0x6a])), TransactionOutput::new(5, ScriptPublicKey::new(vec![]))];
        let tx = PopulatedTransaction::unpopulated(Transaction::new(1, inputs, outputs, 0));

        let report = UtxoTopicManager::new().admit(&tx, &[1, 0, 2]);
        assert_eq!(report.instructions.outputs_to_admit, vec![0, 1]);
        assert_eq!(report.instructions.coins_to_retain, vec![1, 0]);
        assert_eq!(report.skipped_coins, vec![CoinRejection { index: 2, error: AdmissionError::MissingInput(2) }]);
    }
}
