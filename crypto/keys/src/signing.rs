use crate::{
    derivation::derive_anyone_public_key,
    error::{KeyError, KeyResult},
    invoice::InvoiceNumber,
};
use overlay_hashes::{Hasher, HasherBase, MessageDigest};
use secp256k1::{Message, PublicKey, SECP256K1, SecretKey, ecdsa::Signature};
use serde::{Deserialize, Serialize};

/// How much of a token's provenance is checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationMode {
    /// Re-derive the locking key from the identity key, then check the signature.
    #[default]
    Strict,
    /// Only check the signature against the locking key found in the script.
    SignatureOnly,
}

/// SHA-256 over the fields concatenated without delimiters.
pub fn fields_digest(fields: &[Vec<u8>]) -> Message {
    let mut hasher = MessageDigest::new();
    fields.iter().for_each(|field| {
        hasher.update(field);
    });
    Message::from_digest(hasher.finalize().as_bytes())
}

/// Signs the concatenated fields, returning a DER encoded low-S signature.
pub fn sign_fields(secret: &SecretKey, fields: &[Vec<u8>]) -> Vec<u8> {
    SECP256K1.sign_ecdsa(&fields_digest(fields), secret).serialize_der().to_vec()
}

pub fn parse_public_key(bytes: &[u8]) -> KeyResult<PublicKey> {
    PublicKey::from_slice(bytes).map_err(|_| KeyError::InvalidPublicKey(faster_hex::hex_string(bytes)))
}

/// Verifies a DER signature over the concatenated fields. High-S signatures are accepted.
pub fn verify_fields_signature(locking_key: &PublicKey, fields: &[Vec<u8>], signature: &[u8]) -> KeyResult<()> {
    let mut signature = Signature::from_der(signature).map_err(|_| KeyError::InvalidSignatureEncoding)?;
    signature.normalize_s();
    SECP256K1.verify_ecdsa(&fields_digest(fields), &signature, locking_key).map_err(|_| KeyError::InvalidSignature)
}

/// Checks that `locking_key` is the key `identity_key` derives for `protocol_id`.
pub fn verify_locking_key(identity_key: &PublicKey, locking_key: &PublicKey, protocol_id: &str) -> KeyResult<()> {
    let expected = derive_anyone_public_key(identity_key, &InvoiceNumber::admission(protocol_id)?)?;
    if expected != *locking_key {
        return Err(KeyError::InvalidLockingKey { expected: expected.to_string(), found: locking_key.to_string() });
    }
    Ok(())
}

/// Provenance check of an advertisement token: the locking key must be derived from the
/// advertised identity key (strict mode only), and the signature must cover the fields.
pub fn verify_token(
    identity_key: &[u8],
    locking_key: &[u8],
    fields: &[Vec<u8>],
    signature: &[u8],
    protocol_id: &str,
    mode: VerificationMode,
) -> KeyResult<()> {
    let locking_key = parse_public_key(locking_key)?;
    if mode == VerificationMode::Strict {
        verify_locking_key(&parse_public_key(identity_key)?, &locking_key, protocol_id)?;
    }
    verify_fields_signature(&locking_key, fields, signature)
}
