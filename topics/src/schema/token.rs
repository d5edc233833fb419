use super::{integer_field, text_field};
use crate::{
    errors::SchemaError,
    payload::{AssetId, TokenEntry},
};
use std::str::FromStr;

const MIN_TOKEN_FIELDS: usize = 2;
const MAX_TOKEN_FIELDS: usize = 3;

/// Fields: `[assetId, amount]` or `[assetId, amount, metadata]`, where `assetId` is either
/// `ISSUE` or `<txid>.<outputIndex>` and `amount` is an unsigned decimal.
pub fn parse(fields: &[Vec<u8>]) -> Result<TokenEntry, SchemaError> {
    if !(MIN_TOKEN_FIELDS..=MAX_TOKEN_FIELDS).contains(&fields.len()) {
        return Err(SchemaError::FieldCountRange { min: MIN_TOKEN_FIELDS, max: MAX_TOKEN_FIELDS, found: fields.len() });
    }
    let asset_id = text_field(fields, 0)?;
    let asset_id = AssetId::from_str(asset_id).map_err(|_| SchemaError::InvalidAssetId(asset_id.to_string()))?;
    let amount = integer_field(fields, 1)?;
    Ok(TokenEntry { asset_id, amount, metadata: fields.get(2).cloned() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_consensus_core::tx::{TransactionId, TransactionOutpoint};

    const TXID: &str = "1d5b3a6cb7e8e3e61e6b2bfc9c9a0c0c1cf5b7a1b1fb3a3d6a4a4a1e1e1e1e1e";

    #[test]
    fn test_parse() {
        struct Test {
            name: &'static str,
            fields: Vec<Vec<u8>>,
            expected: Result<TokenEntry, SchemaError>,
        }

        let asset = AssetId::Asset(TransactionOutpoint::new(TransactionId::from_str(TXID).unwrap(), 0));
        let tests = vec![
            Test {
                name: "issuance",
                fields: vec![b"ISSUE".to_vec(), b"100".to_vec()],
                expected: Ok(TokenEntry { asset_id: AssetId::Issue, amount: 100, metadata: None }),
            },
            Test {
                name: "transfer with metadata",
                fields: vec![format!("{TXID}.0").into_bytes(), b"75".to_vec(), vec![1, 2, 3]],
                expected: Ok(TokenEntry { asset_id: asset, amount: 75, metadata: Some(vec![1, 2, 3]) }),
            },
            Test {
                name: "empty metadata",
                fields: vec![b"ISSUE".to_vec(), b"0".to_vec(), vec![]],
                expected: Ok(TokenEntry { asset_id: AssetId::Issue, amount: 0, metadata: Some(vec![]) }),
            },
            Test {
                name: "one field",
                fields: vec![b"ISSUE".to_vec()],
                expected: Err(SchemaError::FieldCountRange { min: 2, max: 3, found: 1 }),
            },
            Test {
                name: "four fields",
                fields: vec![b"ISSUE".to_vec(), b"1".to_vec(), vec![], vec![]],
                expected: Err(SchemaError::FieldCountRange { min: 2, max: 3, found: 4 }),
            },
            Test {
                name: "unknown asset",
                fields: vec![b"GOLD".to_vec(), b"1".to_vec()],
                expected: Err(SchemaError::InvalidAssetId("GOLD".to_string())),
            },
            Test {
                name: "upper case asset txid",
                fields: vec![format!("{}.0", TXID.to_uppercase()).into_bytes(), b"1".to_vec()],
                expected: Err(SchemaError::InvalidAssetId(format!("{}.0", TXID.to_uppercase()))),
            },
            Test {
                name: "padded asset index",
                fields: vec![format!("{TXID}.00").into_bytes(), b"1".to_vec()],
                expected: Err(SchemaError::InvalidAssetId(format!("{TXID}.00"))),
            },
            Test {
                name: "negative amount",
                fields: vec![b"ISSUE".to_vec(), b"-1".to_vec()],
                expected: Err(SchemaError::InvalidInteger { index: 1, value: "-1".to_string() }),
            },
            Test {
                name: "binary amount",
                fields: vec![b"ISSUE".to_vec(), vec![100]],
                expected: Err(SchemaError::InvalidInteger { index: 1, value: "d".to_string() }),
            },
        ];

        for test in tests {
            assert_eq!(parse(&test.fields), test.expected, "{} wrong result", test.name);
        }
    }
}
