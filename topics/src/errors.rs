use crate::payload::AssetId;
use overlay_keys::KeyError;
use overlay_txscript::{PushDropError, script_builder::ScriptBuilderError};
use thiserror::Error;

/// A token field fails the structural rules of its protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("expected {min} to {max} fields, found {found}")]
    FieldCountRange { min: usize, max: usize, found: usize },

    #[error("field {0} is not valid UTF-8")]
    NotUtf8(usize),

    #[error("protocol tag {found:?} is not {expected}")]
    ProtocolTag { expected: &'static str, found: String },

    #[error("invalid domain {0:?}")]
    InvalidDomain(String),

    #[error("invalid service name {0:?}")]
    InvalidServiceName(String),

    #[error("protocol address {0} is not the content protocol address")]
    ProtocolAddress(String),

    #[error("invalid advertiser address {0:?}")]
    InvalidAddress(String),

    #[error("content hash is {0} bytes long instead of 32")]
    HashLength(usize),

    #[error("unknown operation {0:?}")]
    InvalidOperation(String),

    #[error("invalid URL {0:?}")]
    InvalidUrl(String),

    #[error("field {index} is not a decimal integer: {value:?}")]
    InvalidInteger { index: usize, value: String },

    #[error("expiry time {value} is outside [{min}, {max}]")]
    ExpiryOutOfRange { value: u64, min: u64, max: u64 },

    #[error("content length {value} is outside [1, {max}]")]
    ContentLengthOutOfRange { value: u64, max: u64 },

    #[error("message has {length} characters, at least {min} are required")]
    MessageTooShort { length: usize, min: usize },

    #[error("invalid asset id {0:?}")]
    InvalidAssetId(String),
}

/// A token output would break the asset ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConservationError {
    #[error("asset {0} is not carried by any previous coin")]
    UnknownAsset(AssetId),

    #[error("metadata of asset {0} differs from its issuance metadata")]
    MetadataMismatch(AssetId),

    #[error("outputs of asset {asset_id} would total {total}, only {spendable} is spendable")]
    AmountExceeded { asset_id: AssetId, total: u64, spendable: u64 },

    #[error("amounts of asset {0} overflow")]
    AmountOverflow(AssetId),
}

/// Why a single output or previous coin is left out of an admission.
///
/// None of these abort the evaluation of the sibling outputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("not a token: {0}")]
    Decode(#[from] PushDropError),

    #[error("schema violation: {0}")]
    Schema(#[from] SchemaError),

    #[error("provenance check failed: {0}")]
    Provenance(#[from] KeyError),

    #[error("conservation violation: {0}")]
    Conservation(#[from] ConservationError),

    #[error("token encoding failed: {0}")]
    Encode(#[from] ScriptBuilderError),

    #[error("previous coin {0} is not an input of the transaction")]
    MissingInput(u32),

    #[error("previous coin {0} spends an output the envelope does not carry")]
    UnresolvedInput(u32),

    #[error("previous coin {0} is listed more than once")]
    DuplicateCoin(u32),
}

pub type AdmissionResult<T> = std::result::Result<T, AdmissionError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown topic {0}")]
    UnknownTopic(String),

    #[error("{name}: minimum {min} exceeds maximum {max}")]
    InvalidRange { name: &'static str, min: u64, max: u64 },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
