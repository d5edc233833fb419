//! Structural rules of each token protocol.
//!
//! A schema turns the raw fields of a decoded token into its typed payload, or reports the
//! first rule the fields break.

pub mod advertisement;
pub mod hello_world;
pub mod token;
pub mod uhrp;

use crate::errors::SchemaError;

pub(crate) fn expect_field_count(fields: &[Vec<u8>], expected: usize) -> Result<(), SchemaError> {
    match fields.len() {
        found if found == expected => Ok(()),
        found => Err(SchemaError::FieldCount { expected, found }),
    }
}

pub(crate) fn text_field(fields: &[Vec<u8>], index: usize) -> Result<&str, SchemaError> {
    std::str::from_utf8(&fields[index]).map_err(|_| SchemaError::NotUtf8(index))
}

/// Parses an unsigned ASCII decimal with no sign, spaces or fraction.
pub(crate) fn parse_decimal(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

pub(crate) fn integer_field(fields: &[Vec<u8>], index: usize) -> Result<u64, SchemaError> {
    parse_decimal(&fields[index])
        .ok_or_else(|| SchemaError::InvalidInteger { index, value: String::from_utf8_lossy(&fields[index]).into_owned() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        struct Test {
            name: &'static str,
            input: &'static [u8],
            expected: Option<u64>,
        }

        let tests = vec![
            Test { name: "zero", input: b"0", expected: Some(0) },
            Test { name: "leading zeros", input: b"0075", expected: Some(75) },
            Test { name: "max", input: b"18446744073709551615", expected: Some(u64::MAX) },
            Test { name: "overflow", input: b"18446744073709551616", expected: None },
            Test { name: "empty", input: b"", expected: None },
            Test { name: "sign", input: b"+5", expected: None },
            Test { name: "negative", input: b"-5", expected: None },
            Test { name: "whitespace", input: b" 5", expected: None },
            Test { name: "fraction", input: b"5.0", expected: None },
            Test { name: "binary", input: &[0x64], expected: None },
        ];

        for test in tests {
            assert_eq!(parse_decimal(test.input), test.expected, "{} wrong result", test.name);
        }
    }
}
