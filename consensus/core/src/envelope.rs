//! Self-describing transaction envelopes.
//!
//! Four layouts are recognized by their leading bytes: BEEF v1 and v2 bundles of a
//! transaction with its ancestors, Atomic BEEF which names its subject explicitly,
//! and extended format transactions that embed every spent output inline.

use crate::{
    errors::{EnvelopeError, EnvelopeResult},
    hashing::{ByteWriter, HasherExtensions, tx::EXTENDED_FORMAT_MARKER},
    merkle_path::MerklePath,
    reader::WireReader,
    tx::{PopulatedTransaction, Transaction, TransactionId, UtxoEntry},
};
use overlay_hashes::HasherBase;
use std::collections::HashMap;

pub const BEEF_V1: u32 = 0xEFBE0001;
pub const BEEF_V2: u32 = 0xEFBE0002;
pub const ATOMIC_BEEF: u32 = 0x01010101;

const TX_FORMAT_RAW: u8 = 0;
const TX_FORMAT_RAW_WITH_BUMP: u8 = 1;
const TX_FORMAT_TXID_ONLY: u8 = 2;

/// A transaction entry of a BEEF bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BeefTx {
    Full { tx: Transaction, bump_index: Option<usize> },
    /// An ancestor known to the recipient, referenced by id only (v2).
    TxidOnly(TransactionId),
}

impl BeefTx {
    pub fn id(&self) -> TransactionId {
        match self {
            BeefTx::Full { tx, .. } => tx.id(),
            BeefTx::TxidOnly(txid) => *txid,
        }
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        match self {
            BeefTx::Full { tx, .. } => Some(tx),
            BeefTx::TxidOnly(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Beef {
    pub version: u32,
    pub bumps: Vec<MerklePath>,
    /// Parents before children.
    pub transactions: Vec<BeefTx>,
    /// Subject named by an Atomic BEEF wrapper.
    pub atomic_txid: Option<TransactionId>,
}

impl Beef {
    pub fn from_bytes(bytes: &[u8]) -> EnvelopeResult<Self> {
        let mut reader = WireReader::new(bytes);
        let beef = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(beef)
    }

    pub fn read(reader: &mut WireReader) -> EnvelopeResult<Self> {
        let mut version = reader.read_u32()?;
        let mut atomic_txid = None;
        if version == ATOMIC_BEEF {
            atomic_txid = Some(reader.read_hash()?);
            version = reader.read_u32()?;
        }
        if version != BEEF_V1 && version != BEEF_V2 {
            return Err(EnvelopeError::UnknownPrefix(version));
        }

        let bump_count = reader.read_len()?;
        let mut bumps = Vec::new();
        for _ in 0..bump_count {
            bumps.push(MerklePath::read(reader)?);
        }

        let tx_count = reader.read_len()?;
        let mut transactions = Vec::new();
        for _ in 0..tx_count {
            let entry = match version {
                BEEF_V1 => {
                    let tx = reader.read_transaction()?;
                    let bump_index = match reader.read_u8()? {
                        0 => None,
                        1 => Some(read_bump_index(reader, bumps.len())?),
                        flag => return Err(EnvelopeError::InvalidTxFormat(flag)),
                    };
                    BeefTx::Full { tx, bump_index }
                }
                _ => match reader.read_u8()? {
                    TX_FORMAT_RAW => BeefTx::Full { tx: reader.read_transaction()?, bump_index: None },
                    TX_FORMAT_RAW_WITH_BUMP => {
                        let bump_index = read_bump_index(reader, bumps.len())?;
                        BeefTx::Full { tx: reader.read_transaction()?, bump_index: Some(bump_index) }
                    }
                    TX_FORMAT_TXID_ONLY => BeefTx::TxidOnly(reader.read_hash()?),
                    format => return Err(EnvelopeError::InvalidTxFormat(format)),
                },
            };
            transactions.push(entry);
        }

        Ok(Self { version, bumps, transactions, atomic_txid })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        if let Some(txid) = self.atomic_txid {
            writer.write_u32(ATOMIC_BEEF).update(txid);
        }
        writer.write_u32(self.version).write_len(self.bumps.len());
        for bump in self.bumps.iter() {
            bump.write(&mut writer);
        }
        writer.write_len(self.transactions.len());
        for entry in self.transactions.iter() {
            match (self.version, entry) {
                (BEEF_V1, BeefTx::Full { tx, bump_index }) => {
                    writer.update(crate::hashing::tx::serialize(tx));
                    match bump_index {
                        Some(index) => writer.write_u8(1).write_len(*index),
                        None => writer.write_u8(0),
                    };
                }
                // v1 has no way to express an id-only entry, those are written as v2 would.
                (_, BeefTx::TxidOnly(txid)) => {
                    writer.write_u8(TX_FORMAT_TXID_ONLY).update(txid);
                }
                (_, BeefTx::Full { tx, bump_index: None }) => {
                    writer.write_u8(TX_FORMAT_RAW).update(crate::hashing::tx::serialize(tx));
                }
                (_, BeefTx::Full { tx, bump_index: Some(index) }) => {
                    writer.write_u8(TX_FORMAT_RAW_WITH_BUMP).write_len(*index).update(crate::hashing::tx::serialize(tx));
                }
            }
        }
        writer.into_bytes()
    }

    pub fn find_transaction(&self, txid: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().filter_map(BeefTx::transaction).find(|tx| tx.id() == *txid)
    }

    /// The transaction the envelope is about: the named subject of an Atomic BEEF,
    /// otherwise the last transaction.
    pub fn subject(&self) -> EnvelopeResult<&Transaction> {
        match self.atomic_txid {
            Some(txid) => self.find_transaction(&txid).ok_or(EnvelopeError::SubjectNotFound(txid)),
            None => self.transactions.last().ok_or(EnvelopeError::NoTransactions)?.transaction().ok_or(EnvelopeError::SubjectIsTxidOnly),
        }
    }

    /// Bundled transactions keyed by id, each id hashed once. The first of duplicate entries wins.
    pub fn transactions_by_id(&self) -> HashMap<TransactionId, &Transaction> {
        let mut index = HashMap::with_capacity(self.transactions.len());
        for tx in self.transactions.iter().filter_map(BeefTx::transaction) {
            index.entry(tx.id()).or_insert(tx);
        }
        index
    }

    /// Pairs each input of `tx` with the output it spends when the source transaction is bundled.
    pub fn populate(&self, tx: &Transaction) -> PopulatedTransaction {
        let sources = self.transactions_by_id();
        let entries = tx
            .inputs
            .iter()
            .map(|input| {
                let source = sources.get(&input.previous_outpoint.transaction_id)?;
                let output = source.outputs.get(input.previous_outpoint.index as usize)?;
                Some(UtxoEntry::new(output.value, output.script_public_key.clone()))
            })
            .collect();
        PopulatedTransaction::new(tx.clone(), entries)
    }

    /// Merkle path of a bundled transaction, if it carries one.
    pub fn merkle_path(&self, txid: &TransactionId) -> Option<&MerklePath> {
        self.transactions.iter().find_map(|entry| match entry {
            BeefTx::Full { tx, bump_index: Some(index) } if tx.id() == *txid => self.bumps.get(*index),
            _ => None,
        })
    }
}

fn read_bump_index(reader: &mut WireReader, count: usize) -> EnvelopeResult<usize> {
    let index = reader.read_var_int()?;
    match usize::try_from(index) {
        Ok(i) if i < count => Ok(i),
        _ => Err(EnvelopeError::BumpIndexOutOfRange { index, count }),
    }
}

/// Decodes any supported envelope into its subject transaction, populated with every spent
/// output the envelope carries.
pub fn parse_envelope(bytes: &[u8]) -> EnvelopeResult<PopulatedTransaction> {
    let reader = WireReader::new(bytes);
    let prefix = reader.peek_u32().ok_or(EnvelopeError::Empty)?;
    match prefix {
        BEEF_V1 | BEEF_V2 | ATOMIC_BEEF => {
            let beef = Beef::from_bytes(bytes)?;
            let subject = beef.subject()?;
            Ok(beef.populate(subject))
        }
        _ if bytes.get(4..10) == Some(&EXTENDED_FORMAT_MARKER[..]) => {
            let mut reader = reader;
            let (tx, entries) = reader.read_extended_transaction()?;
            reader.finish()?;
            Ok(PopulatedTransaction::new(tx, entries.into_iter().map(Some).collect()))
        }
        _ => Err(EnvelopeError::UnknownPrefix(prefix)),
    }
}
