use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("locking key {found} does not match the key {expected} derived from the identity key")]
    InvalidLockingKey { expected: String, found: String },

    #[error("signature does not verify against the locking key")]
    InvalidSignature,

    #[error("invalid public key {0}")]
    InvalidPublicKey(String),

    #[error("signature is not valid DER")]
    InvalidSignatureEncoding,

    #[error("invalid address {0}")]
    InvalidAddress(String),

    #[error("address {address} is not the address of the locking key")]
    AddressMismatch { address: String },

    #[error("invalid invoice number {0}")]
    InvalidInvoiceNumber(String),

    #[error("key derivation failed: {0}")]
    Derivation(#[from] secp256k1::Error),
}

pub type KeyResult<T> = std::result::Result<T, KeyError>;
