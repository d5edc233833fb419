use crate::{
    errors::{EnvelopeError, EnvelopeResult},
    tx::{ScriptPublicKey, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput, UtxoEntry},
};
use overlay_hashes::HASH_SIZE;

/// Sequential little-endian reader over wire bytes.
pub struct WireReader<'a> {
    remaining: &'a [u8], // The unparsed remainder
    offset: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { remaining: data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.remaining
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(&self) -> EnvelopeResult<()> {
        match self.remaining.len() {
            0 => Ok(()),
            n => Err(EnvelopeError::TrailingBytes(n)),
        }
    }

    /// Returns a slice with the first `n` bytes of `remaining`, while setting `remaining` to the remaining part
    pub fn take(&mut self, n: usize) -> EnvelopeResult<&'a [u8]> {
        if n > self.remaining.len() {
            return Err(EnvelopeError::UnexpectedEnd { offset: self.offset, needed: n - self.remaining.len() });
        }
        let (segment, remaining) = self.remaining.split_at(n);
        self.remaining = remaining;
        self.offset += n;
        Ok(segment)
    }

    fn take_array<const N: usize>(&mut self) -> EnvelopeResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn peek_u32(&self) -> Option<u32> {
        let bytes = self.remaining.get(..4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u8(&mut self) -> EnvelopeResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> EnvelopeResult<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> EnvelopeResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> EnvelopeResult<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Reads a `CompactSize` var int.
    pub fn read_var_int(&mut self) -> EnvelopeResult<u64> {
        match self.read_u8()? {
            0xfd => Ok(self.read_u16()? as u64),
            0xfe => Ok(self.read_u32()? as u64),
            0xff => self.read_u64(),
            value => Ok(value as u64),
        }
    }

    /// Reads a var int used as a length or count.
    pub fn read_len(&mut self) -> EnvelopeResult<usize> {
        let len = self.read_var_int()?;
        usize::try_from(len).map_err(|_| EnvelopeError::LengthOverflow(len))
    }

    pub fn read_var_bytes(&mut self) -> EnvelopeResult<&'a [u8]> {
        let len = self.read_len()?;
        self.take(len)
    }

    /// Reads a 32 byte hash in wire order.
    pub fn read_hash(&mut self) -> EnvelopeResult<TransactionId> {
        Ok(TransactionId::from_bytes(self.take_array::<HASH_SIZE>()?))
    }

    pub fn read_input(&mut self) -> EnvelopeResult<TransactionInput> {
        let transaction_id = self.read_hash()?;
        let index = self.read_u32()?;
        let signature_script = self.read_var_bytes()?.to_vec();
        let sequence = self.read_u32()?;
        Ok(TransactionInput::new(TransactionOutpoint::new(transaction_id, index), signature_script, sequence))
    }

    pub fn read_output(&mut self) -> EnvelopeResult<TransactionOutput> {
        let value = self.read_u64()?;
        let script = self.read_var_bytes()?.to_vec();
        Ok(TransactionOutput::new(value, ScriptPublicKey::new(script)))
    }

    fn read_outputs(&mut self) -> EnvelopeResult<Vec<TransactionOutput>> {
        let count = self.read_len()?;
        // Counts come from untrusted data, so vectors grow as items are actually read.
        let mut outputs = Vec::new();
        for _ in 0..count {
            outputs.push(self.read_output()?);
        }
        Ok(outputs)
    }

    /// Reads a raw transaction.
    pub fn read_transaction(&mut self) -> EnvelopeResult<Transaction> {
        let version = self.read_u32()?;
        let count = self.read_len()?;
        let mut inputs = Vec::new();
        for _ in 0..count {
            inputs.push(self.read_input()?);
        }
        let outputs = self.read_outputs()?;
        let lock_time = self.read_u32()?;
        Ok(Transaction::new(version, inputs, outputs, lock_time))
    }

    /// Reads an extended format transaction whose version was already followed by the
    /// extended format marker. Every input carries the output it spends.
    pub fn read_extended_transaction(&mut self) -> EnvelopeResult<(Transaction, Vec<UtxoEntry>)> {
        let version = self.read_u32()?;
        self.take(crate::hashing::tx::EXTENDED_FORMAT_MARKER.len())?;
        let count = self.read_len()?;
        let mut inputs = Vec::new();
        let mut entries = Vec::new();
        for _ in 0..count {
            inputs.push(self.read_input()?);
            let amount = self.read_u64()?;
            let script = self.read_var_bytes()?.to_vec();
            entries.push(UtxoEntry::new(amount, ScriptPublicKey::new(script)));
        }
        let outputs = self.read_outputs()?;
        let lock_time = self.read_u32()?;
        Ok((Transaction::new(version, inputs, outputs, lock_time), entries))
    }
}
