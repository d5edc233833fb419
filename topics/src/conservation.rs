//! Asset ledger of the fungible token protocol.
//!
//! The ledger is rebuilt for every transaction from the previous coins it spends. Outputs are
//! then charged against it in index order, so when a split overspends, the earliest outputs
//! are the ones admitted.

use crate::{
    coordinator::CoinRejection,
    errors::{AdmissionError, AdmissionResult, ConservationError},
    payload::{AssetId, TokenEntry},
    schema,
};
use overlay_consensus_core::tx::{PopulatedTransaction, TransactionOutpoint};
use overlay_txscript::PushDropToken;
use std::collections::{HashMap, HashSet};

/// What the previous coins of a transaction make spendable for one asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendableAsset {
    pub amount: u64,
    /// Metadata of the first previous coin carrying the asset.
    pub metadata: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
pub struct AssetLedger {
    spendable: HashMap<TransactionOutpoint, SpendableAsset>,
    /// Amounts of admitted outputs so far, per asset.
    charged: HashMap<TransactionOutpoint, u64>,
    /// The asset each usable previous coin carries, in the order the coins were given.
    coins: Vec<(u32, TransactionOutpoint)>,
}

impl AssetLedger {
    /// Builds the ledger from the tokens locked by the previous coins.
    ///
    /// Coins that are unknown, listed twice, not carried by the envelope or not valid tokens
    /// are left out and returned along with the reason.
    pub fn from_previous_coins(tx: &PopulatedTransaction, previous_coins: &[u32]) -> (Self, Vec<CoinRejection>) {
        let mut ledger = Self::default();
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();
        for &index in previous_coins {
            if !seen.insert(index) {
                skipped.push(CoinRejection { index, error: AdmissionError::DuplicateCoin(index) });
                continue;
            }
            if let Err(error) = ledger.add_coin(tx, index) {
                skipped.push(CoinRejection { index, error });
            }
        }
        (ledger, skipped)
    }

    fn add_coin(&mut self, tx: &PopulatedTransaction, index: u32) -> AdmissionResult<()> {
        let (input, entry) = tx.populated_input(index as usize).ok_or(AdmissionError::MissingInput(index))?;
        let entry = entry.ok_or(AdmissionError::UnresolvedInput(index))?;
        let token = PushDropToken::decode(entry.script_public_key.script())?;
        let TokenEntry { asset_id, amount, metadata } = schema::token::parse(&token.fields)?;

        // An issuance coin names its asset after the output that minted it.
        let asset = asset_id.effective(input.previous_outpoint);
        match self.spendable.get_mut(&asset) {
            Some(spendable) => {
                spendable.amount =
                    spendable.amount.checked_add(amount).ok_or(ConservationError::AmountOverflow(AssetId::Asset(asset)))?;
            }
            None => {
                self.spendable.insert(asset, SpendableAsset { amount, metadata });
            }
        }
        self.coins.push((index, asset));
        Ok(())
    }

    pub fn spendable(&self, asset: &TransactionOutpoint) -> Option<&SpendableAsset> {
        self.spendable.get(asset)
    }

    /// Charges a token output at `outpoint` against the ledger, returning the asset it carries.
    ///
    /// Issuances are always admitted and mint the asset named by `outpoint`. Other outputs
    /// must name an asset carried by a previous coin, repeat its metadata, and keep the running
    /// total of the asset within what the previous coins provide. A rejected output leaves the
    /// running totals untouched.
    pub fn charge(&mut self, outpoint: TransactionOutpoint, entry: &TokenEntry) -> Result<TransactionOutpoint, ConservationError> {
        let asset = match entry.asset_id {
            AssetId::Issue => return Ok(outpoint),
            AssetId::Asset(asset) => asset,
        };
        let spendable = self.spendable.get(&asset).ok_or(ConservationError::UnknownAsset(entry.asset_id))?;
        if spendable.metadata != entry.metadata {
            return Err(ConservationError::MetadataMismatch(entry.asset_id));
        }
        let charged = self.charged.get(&asset).copied().unwrap_or_default();
        let total = charged.checked_add(entry.amount).ok_or(ConservationError::AmountOverflow(entry.asset_id))?;
        if total > spendable.amount {
            return Err(ConservationError::AmountExceeded { asset_id: entry.asset_id, total, spendable: spendable.amount });
        }
        // only admitted outputs enter the totals, so retention follows admission
        self.charged.insert(asset, total);
        Ok(asset)
    }

    /// Previous coins whose asset is carried forward by at least one admitted output.
    pub fn retained_coins(&self) -> Vec<u32> {
        self.coins
            .iter()
            .filter(|(_, asset)| self.charged.contains_key(asset))
            .map(|(index, _)| *index)
            .collect()
    }
}
