//! Invoice-labelled child keys.
//!
//! Both parties compute the shared point `counterparty_public × own_secret` and use
//! `h = HMAC-SHA256(compressed(shared), invoice)` as the tweak: the public child is
//! `recipient_public + h·G` and the recipient's matching secret is `recipient_secret + h`.
//!
//! Advertisement keys are derived against the well-known "anyone" key whose secret is 1,
//! which makes the shared point equal to the advertiser's identity key itself.

use crate::{
    error::{KeyError, KeyResult},
    invoice::InvoiceNumber,
};
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, SECP256K1, Scalar, SecretKey};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn invoice_tweak(shared: &PublicKey, invoice: &InvoiceNumber) -> KeyResult<Scalar> {
    let mut hmac = HmacSha256::new_from_slice(&shared.serialize()).map_err(|_| KeyError::InvalidInvoiceNumber(invoice.to_string()))?;
    hmac.update(invoice.to_string().as_bytes());
    let digest: [u8; 32] = hmac.finalize().into_bytes().into();
    Scalar::from_be_bytes(digest).map_err(|_| secp256k1::Error::InvalidTweak.into())
}

/// Derives the public child key of `recipient` that `sender_secret` pays to under `invoice`.
pub fn derive_child_public_key(recipient: &PublicKey, sender_secret: &SecretKey, invoice: &InvoiceNumber) -> KeyResult<PublicKey> {
    let shared = recipient.mul_tweak(SECP256K1, &Scalar::from(*sender_secret))?;
    let tweak = invoice_tweak(&shared, invoice)?;
    Ok(recipient.add_exp_tweak(SECP256K1, &tweak)?)
}

/// Derives the secret matching [`derive_child_public_key`] from the recipient side.
pub fn derive_child_secret_key(recipient_secret: &SecretKey, sender: &PublicKey, invoice: &InvoiceNumber) -> KeyResult<SecretKey> {
    let shared = sender.mul_tweak(SECP256K1, &Scalar::from(*recipient_secret))?;
    let tweak = invoice_tweak(&shared, invoice)?;
    Ok(recipient_secret.add_tweak(&tweak)?)
}

/// Expected locking key of a token advertised by `identity_key`, derived for anyone.
pub fn derive_anyone_public_key(identity_key: &PublicKey, invoice: &InvoiceNumber) -> KeyResult<PublicKey> {
    let tweak = invoice_tweak(identity_key, invoice)?;
    Ok(identity_key.add_exp_tweak(SECP256K1, &tweak)?)
}

/// Secret behind [`derive_anyone_public_key`], held by the owner of `identity_secret`.
pub fn derive_anyone_secret_key(identity_secret: &SecretKey, invoice: &InvoiceNumber) -> KeyResult<SecretKey> {
    let identity_key = PublicKey::from_secret_key(SECP256K1, identity_secret);
    let tweak = invoice_tweak(&identity_key, invoice)?;
    Ok(identity_secret.add_tweak(&tweak)?)
}
