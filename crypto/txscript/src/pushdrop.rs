//! PushDrop tokens: data fields pushed and dropped around a `<pubkey> OP_CHECKSIG` lock.
//!
//! Two layouts exist. With the lock before the fields the script reads
//! `<pubkey> OP_CHECKSIG <field_1> .. <field_n> <signature> OP_2DROP.. [OP_DROP]`,
//! with the lock after it reads `<field_1> .. <signature> OP_2DROP.. [OP_DROP] <pubkey> OP_CHECKSIG`.
//! In both the drop sequence is canonical: one `OP_2DROP` per pair of pushed items and a final
//! `OP_DROP` when their count is odd. The last pushed item is always the token signature.

use crate::{
    MAX_SCRIPTS_SIZE,
    opcodes::{OP_DATA_MIN_VAL, ParsedOpcode, codes, parse_script},
    script_builder::{ScriptBuilder, ScriptBuilderResult},
};
use overlay_txscript_errors::TxScriptError;
use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum PushDropError {
    #[error(transparent)]
    Script(#[from] TxScriptError),

    #[error("script has no <pubkey> OP_CHECKSIG lock at either end")]
    MissingLock,

    #[error("opcode {1:#04x} at position {0} is not a data push")]
    NonPushField(usize, u8),

    #[error("no drop opcode follows the pushed fields")]
    MissingDrop,

    #[error("token pushes {0} items but needs at least one field and a signature")]
    TooFewItems(usize),

    #[error("drop sequence has {found} opcodes but the pushed items need {expected}")]
    DropMismatch { expected: usize, found: usize },

    #[error("drop opcode {1:#04x} at position {0} is out of the canonical order")]
    MisplacedDrop(usize, u8),

    #[error("unexpected opcode {1:#04x} at position {0} after the drop sequence")]
    TrailingOpcode(usize, u8),
}

pub type PushDropResult<T> = std::result::Result<T, PushDropError>;

/// Where the `<pubkey> OP_CHECKSIG` lock sits relative to the data fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LockPosition {
    #[default]
    Before,
    After,
}

/// A decoded PushDrop token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushDropToken {
    /// Data fields, signature excluded, in push order.
    pub fields: Vec<Vec<u8>>,
    pub locking_public_key: Vec<u8>,
    /// DER signature over the concatenated fields. Not verified here.
    pub signature: Vec<u8>,
    pub lock_position: LockPosition,
}

impl PushDropToken {
    /// Decodes a locking script into its fields, locking key and signature.
    ///
    /// Fields pushed with small integer opcodes decode to their one byte value,
    /// `OP_0` decodes to `[0]` and `OP_1NEGATE` to `[0x81]`.
    pub fn decode(script: &[u8]) -> PushDropResult<Self> {
        if script.len() > MAX_SCRIPTS_SIZE {
            return Err(TxScriptError::ScriptSize(script.len(), MAX_SCRIPTS_SIZE).into());
        }
        let opcodes: Vec<ParsedOpcode> = parse_script(script).collect::<Result<_, _>>()?;
        let len = opcodes.len();

        let (lock_position, locking_public_key, body, offset) =
            if len >= 2 && is_key_push(&opcodes[0]) && opcodes[1].value() == codes::OpCheckSig {
                (LockPosition::Before, opcodes[0].get_data(), &opcodes[2..], 2)
            } else if len >= 2 && opcodes[len - 1].value() == codes::OpCheckSig && is_key_push(&opcodes[len - 2]) {
                (LockPosition::After, opcodes[len - 2].get_data(), &opcodes[..len - 2], 0)
            } else {
                return Err(PushDropError::MissingLock);
            };

        let mut items = Vec::new();
        let mut drops_at = None;
        for (i, opcode) in body.iter().enumerate() {
            if is_drop(opcode.value()) {
                drops_at = Some(i);
                break;
            }
            let item = opcode.pushed_item().ok_or(PushDropError::NonPushField(offset + i, opcode.value()))?;
            items.push(item);
        }
        let drops_at = drops_at.ok_or(PushDropError::MissingDrop)?;

        if let Some((i, opcode)) = body.iter().enumerate().skip(drops_at).find(|(_, opcode)| !is_drop(opcode.value())) {
            return Err(PushDropError::TrailingOpcode(offset + i, opcode.value()));
        }
        let drops = &body[drops_at..];
        let expected = items.len().div_ceil(2);
        if drops.len() != expected {
            return Err(PushDropError::DropMismatch { expected, found: drops.len() });
        }
        for (i, opcode) in drops.iter().enumerate() {
            let canonical = if i + 1 == expected && items.len() % 2 == 1 { codes::OpDrop } else { codes::Op2Drop };
            if opcode.value() != canonical {
                return Err(PushDropError::MisplacedDrop(offset + drops_at + i, opcode.value()));
            }
        }
        if items.len() < 2 {
            return Err(PushDropError::TooFewItems(items.len()));
        }

        let signature = items.pop().unwrap_or_default();
        Ok(Self { fields: items, locking_public_key: locking_public_key.to_vec(), signature, lock_position })
    }

    /// Encodes this token back into a locking script with minimal pushes.
    pub fn to_script(&self) -> ScriptBuilderResult<Vec<u8>> {
        lock(&self.fields, &self.locking_public_key, &self.signature, self.lock_position)
    }
}

/// Builds a PushDrop locking script for `fields` signed with `signature`.
///
/// An empty field encodes as `OP_0` and therefore decodes as `[0]`.
pub fn lock(fields: &[Vec<u8>], locking_public_key: &[u8], signature: &[u8], position: LockPosition) -> ScriptBuilderResult<Vec<u8>> {
    let mut builder = ScriptBuilder::new();
    if position == LockPosition::Before {
        builder.add_data(locking_public_key)?.add_op(codes::OpCheckSig)?;
    }
    for field in fields {
        builder.add_data(field)?;
    }
    builder.add_data(signature)?;

    let mut remaining = fields.len() + 1;
    while remaining > 1 {
        builder.add_op(codes::Op2Drop)?;
        remaining -= 2;
    }
    if remaining == 1 {
        builder.add_op(codes::OpDrop)?;
    }

    if position == LockPosition::After {
        builder.add_data(locking_public_key)?.add_op(codes::OpCheckSig)?;
    }
    Ok(builder.drain())
}

fn is_key_push(opcode: &ParsedOpcode) -> bool {
    (OP_DATA_MIN_VAL..=codes::OpPushData4).contains(&opcode.value()) && !opcode.get_data().is_empty()
}

fn is_drop(value: u8) -> bool {
    value == codes::OpDrop || value == codes::Op2Drop
}
