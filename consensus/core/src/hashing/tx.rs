use super::{ByteWriter, HasherExtensions};
use crate::tx::{PopulatedTransaction, Transaction, TransactionId, TransactionInput, TransactionOutput, UtxoEntry};
use overlay_hashes::{Hasher, HasherBase};

/// Marker following the version of an extended format transaction.
pub const EXTENDED_FORMAT_MARKER: [u8; 6] = [0x00, 0x00, 0x00, 0x00, 0x00, 0xEF];

/// Not intended for direct use by clients. Instead use `tx.id()`
pub fn id(tx: &Transaction) -> TransactionId {
    let mut hasher = overlay_hashes::TransactionID::new();
    write_transaction(&mut hasher, tx);
    hasher.finalize()
}

/// Raw wire serialization of a transaction.
pub fn serialize(tx: &Transaction) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    write_transaction(&mut writer, tx);
    writer.into_bytes()
}

/// Extended format serialization, embedding the value and locking script of every spent output.
/// Returns `None` when some spent output is unknown.
pub fn serialize_extended(tx: &PopulatedTransaction) -> Option<Vec<u8>> {
    let mut writer = ByteWriter::new();
    writer.write_u32(tx.tx.version).update(EXTENDED_FORMAT_MARKER).write_len(tx.tx.inputs.len());
    for (input, entry) in tx.populated_inputs() {
        write_input(&mut writer, input);
        write_utxo_entry(&mut writer, entry?);
    }
    write_outputs(&mut writer, &tx.tx.outputs);
    writer.write_u32(tx.tx.lock_time);
    Some(writer.into_bytes())
}

/// Write the transaction into the provided hasher in its raw wire layout
fn write_transaction<T: HasherBase>(hasher: &mut T, tx: &Transaction) {
    hasher.write_u32(tx.version).write_len(tx.inputs.len());
    for input in tx.inputs.iter() {
        write_input(hasher, input);
    }
    write_outputs(hasher, &tx.outputs);
    hasher.write_u32(tx.lock_time);
}

#[inline(always)]
fn write_input<T: HasherBase>(hasher: &mut T, input: &TransactionInput) {
    hasher
        .update(input.previous_outpoint.transaction_id)
        .write_u32(input.previous_outpoint.index)
        .write_var_bytes(&input.signature_script)
        .write_u32(input.sequence);
}

#[inline(always)]
fn write_outputs<T: HasherBase>(hasher: &mut T, outputs: &[TransactionOutput]) {
    hasher.write_len(outputs.len());
    for output in outputs {
        hasher.write_u64(output.value).write_var_bytes(output.script_public_key.script());
    }
}

#[inline(always)]
fn write_utxo_entry<T: HasherBase>(hasher: &mut T, entry: &UtxoEntry) {
    hasher.write_u64(entry.amount).write_var_bytes(entry.script_public_key.script());
}
