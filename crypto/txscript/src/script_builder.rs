use std::iter::once;

use crate::{
    MAX_SCRIPTS_SIZE,
    opcodes::{OP_1_NEGATE_VAL, OP_DATA_MAX_VAL, OP_DATA_MIN_VAL, OP_SMALL_INT_MAX_VAL, codes::*},
};
use thiserror::Error;

/// DEFAULT_SCRIPT_ALLOC is the default size used for the backing array
/// for a script being built by the ScriptBuilder. The array will
/// dynamically grow as needed, but this figure is intended to provide
/// enough space for vast majority of locking scripts without needing to grow the
/// backing array multiple times.
const DEFAULT_SCRIPT_ALLOC: usize = 512;

#[derive(Error, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ScriptBuilderError {
    #[error("adding opcode {0} would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    OpCodeRejected(u8),

    #[error("adding {0} opcodes would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    OpCodesRejected(usize),

    #[error("adding {0} bytes of data would exceed the maximum allowed canonical script length of {MAX_SCRIPTS_SIZE}")]
    DataRejected(usize),
}
pub type ScriptBuilderResult<T> = std::result::Result<T, ScriptBuilderError>;

/// ScriptBuilder provides a facility for building custom scripts. It allows
/// you to push opcodes and data while respecting minimal push encoding.
///
/// For example, the following builds a single field token locked to `pub_key`:
///
/// ```
/// use overlay_txscript::opcodes::codes::*;
/// use overlay_txscript::script_builder::{ScriptBuilderResult, ScriptBuilder};
/// fn build_token_script(pub_key: &[u8], field: &[u8], signature: &[u8]) -> ScriptBuilderResult<Vec<u8>> {
///     Ok(ScriptBuilder::new()
///         .add_data(pub_key)?
///         .add_op(OpCheckSig)?
///         .add_data(field)?.add_data(signature)?
///         .add_op(Op2Drop)?
///         .drain())
/// }
/// ```
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { script: Vec::with_capacity(DEFAULT_SCRIPT_ALLOC) }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn drain(&mut self) -> Vec<u8> {
        // The builder is not supposed to be reused after a call to drain.
        std::mem::take(&mut self.script)
    }

    /// Pushes the passed opcode to the end of the script. The script will not
    /// be modified if pushing the opcode would cause the script to exceed the
    /// maximum allowed script size.
    pub fn add_op(&mut self, opcode: u8) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() >= MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpCodeRejected(opcode));
        }

        self.script.push(opcode);
        Ok(self)
    }

    pub fn add_ops(&mut self, opcodes: &[u8]) -> ScriptBuilderResult<&mut Self> {
        if self.script.len() + opcodes.len() > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpCodesRejected(opcodes.len()));
        }

        self.script.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Returns the number of bytes the minimal encoding of the data will take.
    pub fn canonical_data_size(data: &[u8]) -> usize {
        let data_len = data.len();

        // When the data consists of a single number that can be represented
        // by one of the "small integer" opcodes, that opcode will used be instead
        // of a data push opcode followed by the number.
        if data_len == 0 || (data_len == 1 && (data[0] <= OP_SMALL_INT_MAX_VAL || data[0] == OP_1_NEGATE_VAL)) {
            return 1;
        }

        data_len
            + if data_len <= OP_DATA_MAX_VAL as usize {
                1 // length encoded as OpData#
            } else if data_len <= u8::MAX as usize {
                2 // length encoded as OpPushData1 + 1 byte for value
            } else if data_len <= u16::MAX as usize {
                3 // length encoded as OpPushData2 + 2 bytes for value
            } else {
                5 // length encoded as OpPushData4 + 4 bytes for value
            }
    }

    /// Pushes the passed data choosing the minimal opcode for its length.
    /// A zero length buffer and the single byte 0x00 both encode as OP_0.
    fn add_raw_data(&mut self, data: &[u8]) -> &mut Self {
        let data_len = data.len();

        if data_len == 0 || (data_len == 1 && data[0] == 0) {
            self.script.push(Op0);
            return self;
        } else if data_len == 1 && data[0] <= OP_SMALL_INT_MAX_VAL {
            self.script.push((Op1 - 1) + data[0]);
            return self;
        } else if data_len == 1 && data[0] == OP_1_NEGATE_VAL {
            self.script.push(Op1Negate);
            return self;
        }

        if data_len <= OP_DATA_MAX_VAL as usize {
            self.script.push((OP_DATA_MIN_VAL - 1) + data_len as u8);
        } else if data_len <= u8::MAX as usize {
            self.script.extend(once(OpPushData1).chain(once(data_len as u8)));
        } else if data_len <= u16::MAX as usize {
            self.script.extend(once(OpPushData2).chain((data_len as u16).to_le_bytes()));
        } else {
            self.script.extend(once(OpPushData4).chain((data_len as u32).to_le_bytes()));
        }

        self.script.extend(data);
        self
    }

    /// Pushes the passed data to the end of the script using the minimal push opcode.
    ///
    /// The script will not be modified if pushing the data would cause the script to
    /// exceed the maximum allowed size [`MAX_SCRIPTS_SIZE`].
    pub fn add_data(&mut self, data: &[u8]) -> ScriptBuilderResult<&mut Self> {
        let data_size = Self::canonical_data_size(data);

        if self.script.len() + data_size > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::DataRejected(data_size));
        }

        Ok(self.add_raw_data(data))
    }
}

impl Default for ScriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
