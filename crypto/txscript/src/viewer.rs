use crate::{
    TxScriptError,
    opcodes::{OP_DATA_MIN_VAL, codes, opcode_to_str, parse_script},
};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Renders a script as single line assembly, e.g. `02ab.. OP_CHECKSIG 6869 OP_2DROP`.
///
/// Pushes print as hex, `OP_RETURN` prints its trailing data as one hex blob.
pub struct ScriptViewer<'a> {
    script: &'a [u8],
}

impl<'a> ScriptViewer<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        Self { script }
    }

    pub fn to_asm(&self) -> Result<String, TxScriptError> {
        let opcodes: Vec<_> = parse_script(self.script).collect::<Result<_, _>>()?;
        Ok(opcodes
            .iter()
            .map(|opcode| {
                let value = opcode.value();
                let data = opcode.get_data();
                if (OP_DATA_MIN_VAL..=codes::OpPushData4).contains(&value) {
                    faster_hex::hex_string(data)
                } else if value == codes::OpReturn && !data.is_empty() {
                    format!("{} {}", opcode_to_str(value), faster_hex::hex_string(data))
                } else {
                    opcode_to_str(value).to_string()
                }
            })
            .join(" "))
    }
}

impl Display for ScriptViewer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_asm() {
            Ok(asm) => write!(f, "{}", asm),
            Err(err) => write!(f, "<malformed script: {}>", err),
        }
    }
}
