//! Typed payloads of the token protocols.
//!
//! Every protocol turns the generic field list of a decoded token into one of these
//! variants right after decoding, so admission logic never indexes raw fields.

use overlay_consensus_core::tx::{TransactionId, TransactionOutpoint};
use serde::{Serialize, Serializer};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Field 0 of a token that mints a new asset.
pub const ISSUANCE_MARKER: &str = "ISSUE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdvertisementProtocol {
    /// Hosts advertising the topics they carry.
    Ship,
    /// Hosts advertising the lookup services they answer.
    Slap,
}

impl AdvertisementProtocol {
    /// The protocol tag in field 0, also the protocol id of the locking key invoice.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvertisementProtocol::Ship => "SHIP",
            AdvertisementProtocol::Slap => "SLAP",
        }
    }
}

impl Display for AdvertisementProtocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UhrpOperation {
    Advertise,
    Revoke,
}

impl FromStr for UhrpOperation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advertise" => Ok(UhrpOperation::Advertise),
            "revoke" => Ok(UhrpOperation::Revoke),
            _ => Err(()),
        }
    }
}

/// Names the asset a token carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetId {
    /// A fresh issuance, identified afterwards by its own outpoint.
    Issue,
    /// The outpoint of the output that issued the asset.
    Asset(TransactionOutpoint),
}

impl AssetId {
    /// The identity the token carries once admitted at `outpoint`: issuance tokens
    /// are named after their own coordinates.
    pub fn effective(&self, outpoint: TransactionOutpoint) -> TransactionOutpoint {
        match self {
            AssetId::Issue => outpoint,
            AssetId::Asset(asset) => *asset,
        }
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetId::Issue => f.write_str(ISSUANCE_MARKER),
            AssetId::Asset(outpoint) => Display::fmt(outpoint, f),
        }
    }
}

impl FromStr for AssetId {
    type Err = ();

    /// Parses `ISSUE` or `<txid>.<index>`, in the canonical spelling only: lower case txid hex
    /// and an index without leading zeros. Other spellings of the same outpoint are rejected so
    /// that one asset has exactly one id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ISSUANCE_MARKER {
            return Ok(AssetId::Issue);
        }
        let (txid, index) = s.split_once('.').ok_or(())?;
        let transaction_id = TransactionId::from_str(txid).map_err(|_| ())?;
        let index = crate::schema::parse_decimal(index.as_bytes()).ok_or(())?;
        let index = u32::try_from(index).map_err(|_| ())?;
        let outpoint = TransactionOutpoint::new(transaction_id, index);
        if outpoint.to_string() != s {
            return Err(());
        }
        Ok(AssetId::Asset(outpoint))
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A SHIP or SLAP service advertisement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    pub protocol: AdvertisementProtocol,
    /// Compressed identity key of the advertiser, hex encoded.
    pub identity_key: String,
    pub domain: String,
    /// The topic (SHIP) or lookup service (SLAP) being advertised.
    pub topic_or_service: String,
}

/// A UHRP statement that some content is (or no longer is) hosted at a URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAdvertisement {
    pub protocol_address: String,
    pub advertiser_address: String,
    #[serde(serialize_with = "serialize_hex")]
    pub hash: [u8; 32],
    pub operation: UhrpOperation,
    pub url: String,
    pub expiry_time: u64,
    pub content_length: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    pub asset_id: AssetId,
    pub amount: u64,
    #[serde(serialize_with = "serialize_optional_hex")]
    pub metadata: Option<Vec<u8>>,
}

/// The parsed content of an admitted token, one variant per protocol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProtocolPayload {
    Advertisement(Advertisement),
    ContentAdvertisement(ContentAdvertisement),
    HelloWorldMessage { message: String },
    TokenEntry(TokenEntry),
}

impl From<Advertisement> for ProtocolPayload {
    fn from(value: Advertisement) -> Self {
        ProtocolPayload::Advertisement(value)
    }
}

impl From<ContentAdvertisement> for ProtocolPayload {
    fn from(value: ContentAdvertisement) -> Self {
        ProtocolPayload::ContentAdvertisement(value)
    }
}

impl From<TokenEntry> for ProtocolPayload {
    fn from(value: TokenEntry) -> Self {
        ProtocolPayload::TokenEntry(value)
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&faster_hex::hex_string(bytes))
}

fn serialize_optional_hex<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(bytes) => serializer.serialize_some(&faster_hex::hex_string(bytes)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TXID: &str = "880a8eda4b9d9e8ee8a1fdd7a56a5b0e3c0f2a2c08b3bba2c0b6c97f2c9e6a01";

    #[test]
    fn test_asset_id_from_str() {
        struct Test {
            name: &'static str,
            input: String,
            expected: Result<AssetId, ()>,
        }

        let outpoint = TransactionOutpoint::new(TransactionId::from_str(TXID).unwrap(), 3);
        let tests = vec![
            Test { name: "issuance", input: "ISSUE".to_string(), expected: Ok(AssetId::Issue) },
            Test { name: "outpoint", input: format!("{TXID}.3"), expected: Ok(AssetId::Asset(outpoint)) },
            Test { name: "lower case marker", input: "issue".to_string(), expected: Err(()) },
            Test { name: "missing index", input: TXID.to_string(), expected: Err(()) },
            Test { name: "signed index", input: format!("{TXID}.+3"), expected: Err(()) },
            Test { name: "index overflow", input: format!("{TXID}.4294967296"), expected: Err(()) },
            Test { name: "short txid", input: "abcd.0".to_string(), expected: Err(()) },
            Test { name: "upper case txid", input: format!("{}.3", TXID.to_uppercase()), expected: Err(()) },
            Test { name: "padded index", input: format!("{TXID}.03"), expected: Err(()) },
            Test { name: "zero index", input: format!("{TXID}.0"), expected: Ok(AssetId::Asset(TransactionOutpoint::new(outpoint.transaction_id, 0))) },
            Test { name: "padded zero index", input: format!("{TXID}.00"), expected: Err(()) },
        ];

        for test in tests {
            assert_eq!(AssetId::from_str(&test.input), test.expected, "{} wrong result", test.name);
        }
    }

    #[test]
    fn test_asset_id_display() {
        let outpoint = TransactionOutpoint::new(TransactionId::from_str(TXID).unwrap(), 0);
        assert_eq!(AssetId::Issue.to_string(), "ISSUE");
        assert_eq!(AssetId::Asset(outpoint).to_string(), format!("{TXID}.0"));
        assert_eq!(AssetId::Issue.effective(outpoint), outpoint);
    }

    #[test]
    fn test_payload_json() {
        let payload = ProtocolPayload::from(TokenEntry { asset_id: AssetId::Issue, amount: 100, metadata: Some(vec![0xab]) });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "tokenEntry", "assetId": "ISSUE", "amount": 100, "metadata": "ab" }));

        let payload = ProtocolPayload::HelloWorldMessage { message: "hi".to_string() };
        assert_eq!(serde_json::to_value(&payload).unwrap(), serde_json::json!({ "type": "helloWorldMessage", "message": "hi" }));
    }
}
