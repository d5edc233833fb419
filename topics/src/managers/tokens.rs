use super::{TOKENS_TOPIC, TopicManager, TopicMetadata};
use crate::{
    conservation::AssetLedger,
    coordinator::{AdmissionReport, decode_token, scan_outputs},
    schema,
};
use overlay_consensus_core::tx::{PopulatedTransaction, TransactionOutpoint};

const DOCUMENTATION: &str = "# Tokens

These tokens are defined by a UTXO-based protocol on top of PushDrop.

First the asset ID is pushed, in the format `<txid>.<outputIndex>` (hex dot decimal), or `ISSUE` for new assets. Then the amount is pushed as a decimal string. Optionally, metadata is pushed. If pushed in the issuance, it must be repeated unchanged in all future outputs of the asset.

Then the fields are dropped and the P2PK locking script follows.

You can start a new coin by ISSUEing an amount. Its asset ID is then the outpoint of the issuance output. In a subsequent transaction, spend that output as an input and name the asset ID in the outputs.

For any given asset, outputs may not total more than the inputs being spent. Outputs are counted in order, so once an asset's inputs are used up, its later outputs are not admitted. Spent coins are retained when their asset appears in an admitted output.
";

/// Admits fungible token outputs that conserve the assets of the coins they spend.
#[derive(Default)]
pub struct TokenTopicManager;

impl TokenTopicManager {
    pub fn new() -> Self {
        Self
    }
}

impl TopicManager for TokenTopicManager {
    fn topic(&self) -> &'static str {
        TOKENS_TOPIC
    }

    fn admit(&self, tx: &PopulatedTransaction, previous_coins: &[u32]) -> AdmissionReport {
        let (mut ledger, skipped_coins) = AssetLedger::from_previous_coins(tx, previous_coins);
        let txid = tx.id();
        let scan = scan_outputs(self.topic(), tx, |index, output| {
            let token = decode_token(output)?;
            let entry = schema::token::parse(&token.fields)?;
            ledger.charge(TransactionOutpoint::new(txid, index), &entry)?;
            Ok(Some(entry.into()))
        });
        AdmissionReport::new(self.topic(), tx, scan, ledger.retained_coins(), skipped_coins)
    }

    /// Previous coins whose token the envelope does not carry.
    fn identify_needed_inputs(&self, tx: &PopulatedTransaction, previous_coins: &[u32]) -> Vec<TransactionOutpoint> {
        previous_coins
            .iter()
            .filter_map(|&index| match tx.populated_input(index as usize) {
                Some((input, None)) => Some(input.previous_outpoint),
                _ => None,
            })
            .collect()
    }

    fn documentation(&self) -> &'static str {
        DOCUMENTATION
    }

    fn metadata(&self) -> TopicMetadata {
        TopicMetadata {
            name: "TokenTopicManager",
            short_description: "A topic manager for token transactions.",
            icon_url: Some("https://example.com/icon.png"),
            version: Some("1.0.0"),
            information_url: Some("https://example.com/info"),
        }
    }
}
