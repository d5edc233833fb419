use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Represents the ID of a transaction
pub type TransactionId = overlay_hashes::Hash;

/// Represents a locking script
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptPublicKey {
    script: Vec<u8>,
}

impl ScriptPublicKey {
    pub fn new(script: Vec<u8>) -> Self {
        Self { script }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }
}

impl From<Vec<u8>> for ScriptPublicKey {
    fn from(script: Vec<u8>) -> Self {
        Self::new(script)
    }
}

/// The value and locking script of a spent output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub amount: u64,
    pub script_public_key: ScriptPublicKey,
}

impl UtxoEntry {
    pub fn new(amount: u64, script_public_key: ScriptPublicKey) -> Self {
        Self { amount, script_public_key }
    }
}

/// Represents a transaction outpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionOutpoint {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl TransactionOutpoint {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }
}

/// Formats as `<txid>.<index>`, the identifier tokens use to name the output that issued them.
impl Display for TransactionOutpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.transaction_id, self.index)
    }
}

/// Represents a transaction input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub previous_outpoint: TransactionOutpoint,
    pub signature_script: Vec<u8>,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn new(previous_outpoint: TransactionOutpoint, signature_script: Vec<u8>, sequence: u32) -> Self {
        Self { previous_outpoint, signature_script, sequence }
    }
}

/// Represents a transaction output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_public_key: ScriptPublicKey,
}

impl TransactionOutput {
    pub fn new(value: u64, script_public_key: ScriptPublicKey) -> Self {
        Self { value, script_public_key }
    }
}

/// Represents a transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,

    #[serde(default)]
    id: TransactionId,
}

impl Transaction {
    pub fn new(version: u32, inputs: Vec<TransactionInput>, outputs: Vec<TransactionOutput>, lock_time: u32) -> Self {
        let mut tx = Self { version, inputs, outputs, lock_time, id: Default::default() };
        tx.finalize();
        tx
    }

    /// Recompute and finalize the tx id based on updated tx fields
    pub fn finalize(&mut self) {
        self.id = crate::hashing::tx::id(self);
    }

    /// Returns the transaction ID
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn outpoint(&self, index: u32) -> TransactionOutpoint {
        TransactionOutpoint::new(self.id, index)
    }
}

/// A transaction whose inputs are paired with the outputs they spend, where known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulatedTransaction {
    pub tx: Transaction,
    /// One slot per input, `None` when the spent output is not available.
    pub entries: Vec<Option<UtxoEntry>>,
}

impl PopulatedTransaction {
    pub fn new(tx: Transaction, entries: Vec<Option<UtxoEntry>>) -> Self {
        assert_eq!(tx.inputs.len(), entries.len());
        Self { tx, entries }
    }

    /// A transaction without any known spent outputs.
    pub fn unpopulated(tx: Transaction) -> Self {
        let entries = vec![None; tx.inputs.len()];
        Self { tx, entries }
    }

    pub fn id(&self) -> TransactionId {
        self.tx.id()
    }

    /// The input at `index` along with the output it spends, if known.
    pub fn populated_input(&self, index: usize) -> Option<(&TransactionInput, Option<&UtxoEntry>)> {
        let input = self.tx.inputs.get(index)?;
        Some((input, self.entries.get(index).and_then(Option::as_ref)))
    }

    pub fn populated_inputs(&self) -> impl ExactSizeIterator<Item = (&TransactionInput, Option<&UtxoEntry>)> {
        self.tx.inputs.iter().zip(self.entries.iter().map(Option::as_ref))
    }

    pub fn is_fully_populated(&self) -> bool {
        self.entries.iter().all(Option::is_some)
    }
}
