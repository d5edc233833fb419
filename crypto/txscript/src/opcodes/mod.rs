#[macro_use]
mod macros;

use crate::TxScriptError;
use overlay_txscript_errors::TxScriptResult;

/// First value in the range formed by the "small integer" Op# opcodes
pub const OP_SMALL_INT_MIN_VAL: u8 = 1;
/// Last value in the range formed by the "small integer" Op# opcodes
pub const OP_SMALL_INT_MAX_VAL: u8 = 16;
/// First value in the range formed by OpData# opcodes (where opcode == value)
pub const OP_DATA_MIN_VAL: u8 = self::codes::OpData1;
/// Last value in the range formed by OpData# opcodes (where opcode == value)
pub const OP_DATA_MAX_VAL: u8 = self::codes::OpData75;
/// Minus 1 value
pub const OP_1_NEGATE_VAL: u8 = 0x81;

/// How many bytes an opcode occupies in a serialized script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpLength {
    /// Total length, opcode byte included.
    Fixed(usize),
    /// Width of the little-endian length prefix following the opcode.
    Prefixed(usize),
}

/// A single opcode read out of a script, borrowing its push data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedOpcode<'a> {
    value: u8,
    data: &'a [u8],
}

impl<'a> ParsedOpcode<'a> {
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn get_data(&self) -> &'a [u8] {
        self.data
    }

    /// True for every opcode that only places an item on the stack.
    pub fn is_push_opcode(&self) -> bool {
        self.value <= codes::Op16 && self.value != codes::OpReserved
    }

    /// The stack item produced by a push opcode. Small integer opcodes yield their
    /// single byte value, `OP_0` yields `[0]` and `OP_1NEGATE` yields `[0x81]`.
    pub fn pushed_item(&self) -> Option<Vec<u8>> {
        match self.value {
            codes::OpFalse => Some(vec![0]),
            codes::Op1Negate => Some(vec![OP_1_NEGATE_VAL]),
            OP_DATA_MIN_VAL..=codes::OpPushData4 => Some(self.data.to_vec()),
            codes::OpTrue..=codes::Op16 => Some(vec![self.value - codes::OpTrue + OP_SMALL_INT_MIN_VAL]),
            _ => None,
        }
    }
}

/// Iterator over the opcodes of a serialized script.
///
/// An `OP_RETURN` outside of any conditional block terminates parsing and carries the
/// remainder of the script as its data. Iteration stops after the first error.
pub struct ScriptParser<'a> {
    script: &'a [u8],
    pos: usize,
    conditional_depth: usize,
    failed: bool,
}

pub fn parse_script(script: &[u8]) -> ScriptParser<'_> {
    ScriptParser { script, pos: 0, conditional_depth: 0, failed: false }
}

impl<'a> ScriptParser<'a> {
    fn deserialize_next_opcode(&mut self) -> TxScriptResult<ParsedOpcode<'a>> {
        let value = self.script[self.pos];
        let rest = &self.script[self.pos + 1..];

        if value == codes::OpReturn && self.conditional_depth == 0 {
            self.pos = self.script.len();
            return Ok(ParsedOpcode { value, data: rest });
        }

        match value {
            codes::OpIf | codes::OpNotIf | codes::OpVerIf | codes::OpVerNotIf => self.conditional_depth += 1,
            codes::OpEndIf => self.conditional_depth = self.conditional_depth.saturating_sub(1),
            _ => {}
        }

        match opcode_length(value) {
            OpLength::Fixed(length) => {
                let needed = length - 1;
                if rest.len() < needed {
                    return Err(TxScriptError::MalformedPush(needed, rest.len()));
                }
                self.pos += length;
                Ok(ParsedOpcode { value, data: &rest[..needed] })
            }
            OpLength::Prefixed(width) => {
                if rest.len() < width {
                    return Err(TxScriptError::MalformedPushSize(rest.to_vec()));
                }
                let mut length_bytes = [0u8; 4];
                length_bytes[..width].copy_from_slice(&rest[..width]);
                let length = u32::from_le_bytes(length_bytes) as usize;
                let body = &rest[width..];
                if body.len() < length {
                    return Err(TxScriptError::MalformedPush(length, body.len()));
                }
                self.pos += 1 + width + length;
                Ok(ParsedOpcode { value, data: &body[..length] })
            }
        }
    }
}

impl<'a> Iterator for ScriptParser<'a> {
    type Item = TxScriptResult<ParsedOpcode<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.script.len() {
            return None;
        }
        let parsed = self.deserialize_next_opcode();
        self.failed = parsed.is_err();
        Some(parsed)
    }
}

opcode_list! {

    // Data push opcodes.
    opcode |Op0| OpFalse<0x00, 1> "OP_0"

    opcode OpData1<0x01, 2> "OP_PUSHBYTES_1"
    opcode OpData2<0x02, 3> "OP_PUSHBYTES_2"
    opcode OpData3<0x03, 4> "OP_PUSHBYTES_3"
    opcode OpData4<0x04, 5> "OP_PUSHBYTES_4"
    opcode OpData5<0x05, 6> "OP_PUSHBYTES_5"
    opcode OpData6<0x06, 7> "OP_PUSHBYTES_6"
    opcode OpData7<0x07, 8> "OP_PUSHBYTES_7"
    opcode OpData8<0x08, 9> "OP_PUSHBYTES_8"
    opcode OpData9<0x09, 10> "OP_PUSHBYTES_9"
    opcode OpData10<0x0a, 11> "OP_PUSHBYTES_10"
    opcode OpData11<0x0b, 12> "OP_PUSHBYTES_11"
    opcode OpData12<0x0c, 13> "OP_PUSHBYTES_12"
    opcode OpData13<0x0d, 14> "OP_PUSHBYTES_13"
    opcode OpData14<0x0e, 15> "OP_PUSHBYTES_14"
    opcode OpData15<0x0f, 16> "OP_PUSHBYTES_15"
    opcode OpData16<0x10, 17> "OP_PUSHBYTES_16"
    opcode OpData17<0x11, 18> "OP_PUSHBYTES_17"
    opcode OpData18<0x12, 19> "OP_PUSHBYTES_18"
    opcode OpData19<0x13, 20> "OP_PUSHBYTES_19"
    opcode OpData20<0x14, 21> "OP_PUSHBYTES_20"
    opcode OpData21<0x15, 22> "OP_PUSHBYTES_21"
    opcode OpData22<0x16, 23> "OP_PUSHBYTES_22"
    opcode OpData23<0x17, 24> "OP_PUSHBYTES_23"
    opcode OpData24<0x18, 25> "OP_PUSHBYTES_24"
    opcode OpData25<0x19, 26> "OP_PUSHBYTES_25"
    opcode OpData26<0x1a, 27> "OP_PUSHBYTES_26"
    opcode OpData27<0x1b, 28> "OP_PUSHBYTES_27"
    opcode OpData28<0x1c, 29> "OP_PUSHBYTES_28"
    opcode OpData29<0x1d, 30> "OP_PUSHBYTES_29"
    opcode OpData30<0x1e, 31> "OP_PUSHBYTES_30"
    opcode OpData31<0x1f, 32> "OP_PUSHBYTES_31"
    opcode OpData32<0x20, 33> "OP_PUSHBYTES_32"
    opcode OpData33<0x21, 34> "OP_PUSHBYTES_33"
    opcode OpData34<0x22, 35> "OP_PUSHBYTES_34"
    opcode OpData35<0x23, 36> "OP_PUSHBYTES_35"
    opcode OpData36<0x24, 37> "OP_PUSHBYTES_36"
    opcode OpData37<0x25, 38> "OP_PUSHBYTES_37"
    opcode OpData38<0x26, 39> "OP_PUSHBYTES_38"
    opcode OpData39<0x27, 40> "OP_PUSHBYTES_39"
    opcode OpData40<0x28, 41> "OP_PUSHBYTES_40"
    opcode OpData41<0x29, 42> "OP_PUSHBYTES_41"
    opcode OpData42<0x2a, 43> "OP_PUSHBYTES_42"
    opcode OpData43<0x2b, 44> "OP_PUSHBYTES_43"
    opcode OpData44<0x2c, 45> "OP_PUSHBYTES_44"
    opcode OpData45<0x2d, 46> "OP_PUSHBYTES_45"
    opcode OpData46<0x2e, 47> "OP_PUSHBYTES_46"
    opcode OpData47<0x2f, 48> "OP_PUSHBYTES_47"
    opcode OpData48<0x30, 49> "OP_PUSHBYTES_48"
    opcode OpData49<0x31, 50> "OP_PUSHBYTES_49"
    opcode OpData50<0x32, 51> "OP_PUSHBYTES_50"
    opcode OpData51<0x33, 52> "OP_PUSHBYTES_51"
    opcode OpData52<0x34, 53> "OP_PUSHBYTES_52"
    opcode OpData53<0x35, 54> "OP_PUSHBYTES_53"
    opcode OpData54<0x36, 55> "OP_PUSHBYTES_54"
    opcode OpData55<0x37, 56> "OP_PUSHBYTES_55"
    opcode OpData56<0x38, 57> "OP_PUSHBYTES_56"
    opcode OpData57<0x39, 58> "OP_PUSHBYTES_57"
    opcode OpData58<0x3a, 59> "OP_PUSHBYTES_58"
    opcode OpData59<0x3b, 60> "OP_PUSHBYTES_59"
    opcode OpData60<0x3c, 61> "OP_PUSHBYTES_60"
    opcode OpData61<0x3d, 62> "OP_PUSHBYTES_61"
    opcode OpData62<0x3e, 63> "OP_PUSHBYTES_62"
    opcode OpData63<0x3f, 64> "OP_PUSHBYTES_63"
    opcode OpData64<0x40, 65> "OP_PUSHBYTES_64"
    opcode OpData65<0x41, 66> "OP_PUSHBYTES_65"
    opcode OpData66<0x42, 67> "OP_PUSHBYTES_66"
    opcode OpData67<0x43, 68> "OP_PUSHBYTES_67"
    opcode OpData68<0x44, 69> "OP_PUSHBYTES_68"
    opcode OpData69<0x45, 70> "OP_PUSHBYTES_69"
    opcode OpData70<0x46, 71> "OP_PUSHBYTES_70"
    opcode OpData71<0x47, 72> "OP_PUSHBYTES_71"
    opcode OpData72<0x48, 73> "OP_PUSHBYTES_72"
    opcode OpData73<0x49, 74> "OP_PUSHBYTES_73"
    opcode OpData74<0x4a, 75> "OP_PUSHBYTES_74"
    opcode OpData75<0x4b, 76> "OP_PUSHBYTES_75"

    opcode OpPushData1<0x4c, u8> "OP_PUSHDATA1"
    opcode OpPushData2<0x4d, u16> "OP_PUSHDATA2"
    opcode OpPushData4<0x4e, u32> "OP_PUSHDATA4"

    opcode Op1Negate<0x4f, 1> "OP_1NEGATE"

    opcode OpReserved<0x50, 1> "OP_RESERVED"

    opcode |Op1| OpTrue<0x51, 1> "OP_1"
    opcode Op2<0x52, 1> "OP_2"
    opcode Op3<0x53, 1> "OP_3"
    opcode Op4<0x54, 1> "OP_4"
    opcode Op5<0x55, 1> "OP_5"
    opcode Op6<0x56, 1> "OP_6"
    opcode Op7<0x57, 1> "OP_7"
    opcode Op8<0x58, 1> "OP_8"
    opcode Op9<0x59, 1> "OP_9"
    opcode Op10<0x5a, 1> "OP_10"
    opcode Op11<0x5b, 1> "OP_11"
    opcode Op12<0x5c, 1> "OP_12"
    opcode Op13<0x5d, 1> "OP_13"
    opcode Op14<0x5e, 1> "OP_14"
    opcode Op15<0x5f, 1> "OP_15"
    opcode Op16<0x60, 1> "OP_16"

    // Control opcodes.
    opcode OpNop<0x61, 1> "OP_NOP"
    opcode OpVer<0x62, 1> "OP_VER"
    opcode OpIf<0x63, 1> "OP_IF"
    opcode OpNotIf<0x64, 1> "OP_NOTIF"
    opcode OpVerIf<0x65, 1> "OP_VERIF"
    opcode OpVerNotIf<0x66, 1> "OP_VERNOTIF"
    opcode OpElse<0x67, 1> "OP_ELSE"
    opcode OpEndIf<0x68, 1> "OP_ENDIF"
    opcode OpVerify<0x69, 1> "OP_VERIFY"
    opcode OpReturn<0x6a, 1> "OP_RETURN"

    // Stack opcodes.
    opcode OpToAltStack<0x6b, 1> "OP_TOALTSTACK"
    opcode OpFromAltStack<0x6c, 1> "OP_FROMALTSTACK"
    opcode Op2Drop<0x6d, 1> "OP_2DROP"
    opcode Op2Dup<0x6e, 1> "OP_2DUP"
    opcode Op3Dup<0x6f, 1> "OP_3DUP"
    opcode Op2Over<0x70, 1> "OP_2OVER"
    opcode Op2Rot<0x71, 1> "OP_2ROT"
    opcode Op2Swap<0x72, 1> "OP_2SWAP"
    opcode OpIfDup<0x73, 1> "OP_IFDUP"
    opcode OpDepth<0x74, 1> "OP_DEPTH"
    opcode OpDrop<0x75, 1> "OP_DROP"
    opcode OpDup<0x76, 1> "OP_DUP"
    opcode OpNip<0x77, 1> "OP_NIP"
    opcode OpOver<0x78, 1> "OP_OVER"
    opcode OpPick<0x79, 1> "OP_PICK"
    opcode OpRoll<0x7a, 1> "OP_ROLL"
    opcode OpRot<0x7b, 1> "OP_ROT"
    opcode OpSwap<0x7c, 1> "OP_SWAP"
    opcode OpTuck<0x7d, 1> "OP_TUCK"

    // Splice opcodes.
    opcode OpCat<0x7e, 1> "OP_CAT"
    opcode OpSplit<0x7f, 1> "OP_SPLIT"
    opcode OpNum2Bin<0x80, 1> "OP_NUM2BIN"
    opcode OpBin2Num<0x81, 1> "OP_BIN2NUM"
    opcode OpSize<0x82, 1> "OP_SIZE"

    // Bitwise logic opcodes.
    opcode OpInvert<0x83, 1> "OP_INVERT"
    opcode OpAnd<0x84, 1> "OP_AND"
    opcode OpOr<0x85, 1> "OP_OR"
    opcode OpXor<0x86, 1> "OP_XOR"
    opcode OpEqual<0x87, 1> "OP_EQUAL"
    opcode OpEqualVerify<0x88, 1> "OP_EQUALVERIFY"
    opcode OpReserved1<0x89, 1> "OP_RESERVED1"
    opcode OpReserved2<0x8a, 1> "OP_RESERVED2"

    // Numeric related opcodes.
    opcode Op1Add<0x8b, 1> "OP_1ADD"
    opcode Op1Sub<0x8c, 1> "OP_1SUB"
    opcode Op2Mul<0x8d, 1> "OP_2MUL"
    opcode Op2Div<0x8e, 1> "OP_2DIV"
    opcode OpNegate<0x8f, 1> "OP_NEGATE"
    opcode OpAbs<0x90, 1> "OP_ABS"
    opcode OpNot<0x91, 1> "OP_NOT"
    opcode Op0NotEqual<0x92, 1> "OP_0NOTEQUAL"
    opcode OpAdd<0x93, 1> "OP_ADD"
    opcode OpSub<0x94, 1> "OP_SUB"
    opcode OpMul<0x95, 1> "OP_MUL"
    opcode OpDiv<0x96, 1> "OP_DIV"
    opcode OpMod<0x97, 1> "OP_MOD"
    opcode OpLShift<0x98, 1> "OP_LSHIFT"
    opcode OpRShift<0x99, 1> "OP_RSHIFT"
    opcode OpBoolAnd<0x9a, 1> "OP_BOOLAND"
    opcode OpBoolOr<0x9b, 1> "OP_BOOLOR"
    opcode OpNumEqual<0x9c, 1> "OP_NUMEQUAL"
    opcode OpNumEqualVerify<0x9d, 1> "OP_NUMEQUALVERIFY"
    opcode OpNumNotEqual<0x9e, 1> "OP_NUMNOTEQUAL"
    opcode OpLessThan<0x9f, 1> "OP_LESSTHAN"
    opcode OpGreaterThan<0xa0, 1> "OP_GREATERTHAN"
    opcode OpLessThanOrEqual<0xa1, 1> "OP_LESSTHANOREQUAL"
    opcode OpGreaterThanOrEqual<0xa2, 1> "OP_GREATERTHANOREQUAL"
    opcode OpMin<0xa3, 1> "OP_MIN"
    opcode OpMax<0xa4, 1> "OP_MAX"
    opcode OpWithin<0xa5, 1> "OP_WITHIN"

    // Crypto opcodes.
    opcode OpRipemd160<0xa6, 1> "OP_RIPEMD160"
    opcode OpSha1<0xa7, 1> "OP_SHA1"
    opcode OpSHA256<0xa8, 1> "OP_SHA256"
    opcode OpHash160<0xa9, 1> "OP_HASH160"
    opcode OpHash256<0xaa, 1> "OP_HASH256"
    opcode OpCodeSeparator<0xab, 1> "OP_CODESEPARATOR"
    opcode OpCheckSig<0xac, 1> "OP_CHECKSIG"
    opcode OpCheckSigVerify<0xad, 1> "OP_CHECKSIGVERIFY"
    opcode OpCheckMultiSig<0xae, 1> "OP_CHECKMULTISIG"
    opcode OpCheckMultiSigVerify<0xaf, 1> "OP_CHECKMULTISIGVERIFY"

    // Expansion opcodes.
    opcode OpNop1<0xb0, 1> "OP_NOP1"
    opcode OpNop2<0xb1, 1> "OP_NOP2"
    opcode OpNop3<0xb2, 1> "OP_NOP3"
    opcode OpNop4<0xb3, 1> "OP_NOP4"
    opcode OpNop5<0xb4, 1> "OP_NOP5"
    opcode OpNop6<0xb5, 1> "OP_NOP6"
    opcode OpNop7<0xb6, 1> "OP_NOP7"
    opcode OpNop8<0xb7, 1> "OP_NOP8"
    opcode OpNop9<0xb8, 1> "OP_NOP9"
    opcode OpNop10<0xb9, 1> "OP_NOP10"
}

#[cfg(test)]
mod test {
    use super::*;

    struct Test<'a> {
        name: &'static str,
        script: &'a [u8],
        expected: Result<Vec<(u8, Vec<u8>)>, TxScriptError>,
    }

    #[test]
    fn test_parse_script() {
        let tests = vec![
            Test { name: "empty script", script: &[], expected: Ok(vec![]) },
            Test {
                name: "small data push followed by opcode",
                script: &[codes::OpData2, 0xaa, 0xbb, codes::OpCheckSig],
                expected: Ok(vec![(codes::OpData2, vec![0xaa, 0xbb]), (codes::OpCheckSig, vec![])]),
            },
            Test {
                name: "pushdata1 with one byte prefix",
                script: &[codes::OpPushData1, 0x03, 1, 2, 3],
                expected: Ok(vec![(codes::OpPushData1, vec![1, 2, 3])]),
            },
            Test {
                name: "pushdata2 with little-endian prefix",
                script: &[codes::OpPushData2, 0x02, 0x00, 9, 8, codes::OpDrop],
                expected: Ok(vec![(codes::OpPushData2, vec![9, 8]), (codes::OpDrop, vec![])]),
            },
            Test {
                name: "pushdata4 with zero length",
                script: &[codes::OpPushData4, 0, 0, 0, 0],
                expected: Ok(vec![(codes::OpPushData4, vec![])]),
            },
            Test {
                name: "truncated fixed push",
                script: &[codes::OpData3, 0x01],
                expected: Err(TxScriptError::MalformedPush(3, 1)),
            },
            Test {
                name: "truncated length prefix",
                script: &[codes::OpPushData2, 0x01],
                expected: Err(TxScriptError::MalformedPushSize(vec![0x01])),
            },
            Test {
                name: "pushdata body shorter than prefix",
                script: &[codes::OpPushData1, 0x05, 1, 2],
                expected: Err(TxScriptError::MalformedPush(5, 2)),
            },
            Test {
                name: "op_return swallows the rest of the script",
                script: &[codes::OpFalse, codes::OpReturn, codes::OpData1, 0x01, 0xff],
                expected: Ok(vec![(codes::OpFalse, vec![]), (codes::OpReturn, vec![codes::OpData1, 0x01, 0xff])]),
            },
            Test {
                name: "op_return inside a conditional is a plain opcode",
                script: &[codes::OpIf, codes::OpReturn, codes::OpEndIf, codes::OpTrue],
                expected: Ok(vec![
                    (codes::OpIf, vec![]),
                    (codes::OpReturn, vec![]),
                    (codes::OpEndIf, vec![]),
                    (codes::OpTrue, vec![]),
                ]),
            },
        ];

        for test in tests {
            let result: Result<Vec<_>, _> =
                parse_script(test.script).map(|op| op.map(|op| (op.value(), op.get_data().to_vec()))).collect();
            assert_eq!(result, test.expected, "{} failed", test.name);
        }
    }

    #[test]
    fn test_parser_stops_after_error() {
        let script = [codes::OpData2, 0x01];
        let mut parser = parse_script(&script);
        assert!(parser.next().is_some_and(|r| r.is_err()));
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_pushed_item() {
        let tests: Vec<(&[u8], Option<Vec<u8>>)> = vec![
            (&[codes::OpFalse], Some(vec![0])),
            (&[codes::Op1Negate], Some(vec![0x81])),
            (&[codes::OpTrue], Some(vec![1])),
            (&[codes::Op16], Some(vec![16])),
            (&[codes::OpData1, 0x7f], Some(vec![0x7f])),
            (&[codes::OpPushData1, 0x00], Some(vec![])),
            (&[codes::OpReserved], None),
            (&[codes::OpDrop], None),
        ];
        for (script, expected) in tests {
            let op = parse_script(script).next().unwrap().unwrap();
            assert_eq!(op.pushed_item(), expected, "pushed item of {}", opcode_to_str(op.value()));
            assert_eq!(op.is_push_opcode(), expected.is_some());
        }
    }

    #[test]
    fn test_opcode_names() {
        assert_eq!(opcode_to_str(codes::OpCheckSig), "OP_CHECKSIG");
        assert_eq!(opcode_to_str(codes::Op2Drop), "OP_2DROP");
        assert_eq!(opcode_to_str(codes::Op0), "OP_0");
        assert_eq!(opcode_to_str(codes::OpData33), "OP_PUSHBYTES_33");
        assert_eq!(opcode_to_str(0xfe), "OP_UNKNOWN");
    }
}
