//! Creation of SHIP and SLAP advertisement tokens.

use crate::{errors::AdmissionResult, payload::AdvertisementProtocol, schema};
use overlay_keys::{InvoiceNumber, PublicKey, SecretKey, derive_anyone_secret_key, sign_fields, verify_locking_key};
use overlay_txscript::{LockPosition, pushdrop::lock};
use secp256k1::SECP256K1;

/// Builds the locking script of an advertisement by the owner of `identity_secret`.
///
/// The fields are checked against the protocol rules, and the locking key is derived from the
/// identity key with the protocol's invoice number, so the token passes strict admission.
pub fn create_advertisement(
    identity_secret: &SecretKey,
    protocol: AdvertisementProtocol,
    domain: &str,
    topic_or_service: &str,
) -> AdmissionResult<Vec<u8>> {
    let identity_key = PublicKey::from_secret_key(SECP256K1, identity_secret);
    let fields = vec![
        protocol.as_str().as_bytes().to_vec(),
        identity_key.serialize().to_vec(),
        domain.as_bytes().to_vec(),
        topic_or_service.as_bytes().to_vec(),
    ];
    schema::advertisement::parse(protocol, &fields)?;

    let locking_secret = derive_anyone_secret_key(identity_secret, &InvoiceNumber::admission(protocol.as_str())?)?;
    let locking_key = PublicKey::from_secret_key(SECP256K1, &locking_secret);
    verify_locking_key(&identity_key, &locking_key, protocol.as_str())?;

    let signature = sign_fields(&locking_secret, &fields);
    Ok(lock(&fields, &locking_key.serialize(), &signature, LockPosition::Before)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AdmissionError, SchemaError};
    use overlay_keys::{VerificationMode, verify_token};
    use overlay_txscript::PushDropToken;

    const IDENTITY_KEY: &str = "034f355bdcb7cc0af728ef3cceb9615d90684bb5b2ca5f859ab0f0b704075871aa";
    const SHIP_LOCKING_KEY: &str = "028e733744807dec2363380c680f62e9892f13b1e2da458a64c7d640002bd3460d";
    const SLAP_LOCKING_KEY: &str = "02479cfbe65402a80eeab9f4402357ee276cd27d70c9e3fb151bec73e14708e643";

    #[test]
    fn test_create_advertisement() {
        struct Test {
            name: &'static str,
            protocol: AdvertisementProtocol,
            domain: &'static str,
            topic_or_service: &'static str,
            locking_key: &'static str,
        }

        let tests = vec![
            Test {
                name: "ship",
                protocol: AdvertisementProtocol::Ship,
                domain: "https://overlay.example.com",
                topic_or_service: "tm_tokens",
                locking_key: SHIP_LOCKING_KEY,
            },
            Test {
                name: "slap",
                protocol: AdvertisementProtocol::Slap,
                domain: "example.com",
                topic_or_service: "ls_tokens",
                locking_key: SLAP_LOCKING_KEY,
            },
        ];

        let identity_secret = SecretKey::from_slice(&[0x11; 32]).unwrap();
        for test in tests {
            let script = create_advertisement(&identity_secret, test.protocol, test.domain, test.topic_or_service).unwrap();
            let token = PushDropToken::decode(&script).unwrap();
            assert_eq!(token.lock_position, LockPosition::Before, "{} wrong layout", test.name);
            assert_eq!(faster_hex::hex_string(&token.locking_public_key), test.locking_key, "{} wrong locking key", test.name);
            assert_eq!(faster_hex::hex_string(&token.fields[1]), IDENTITY_KEY, "{} wrong identity key", test.name);
            assert_eq!(token.fields[2], test.domain.as_bytes(), "{} wrong domain", test.name);
            verify_token(
                &token.fields[1],
                &token.locking_public_key,
                &token.fields,
                &token.signature,
                test.protocol.as_str(),
                VerificationMode::Strict,
            )
            .unwrap_or_else(|err| panic!("{}: {err}", test.name));
        }
    }

    #[test]
    fn test_rejects_invalid_fields() {
        let identity_secret = SecretKey::from_slice(&[0x11; 32]).unwrap();
        assert_eq!(
            create_advertisement(&identity_secret, AdvertisementProtocol::Slap, "example.com", "Search"),
            Err(AdmissionError::Schema(SchemaError::InvalidServiceName("Search".to_string())))
        );
        assert_eq!(
            create_advertisement(&identity_secret, AdvertisementProtocol::Ship, "nowhere", "tm_tokens"),
            Err(AdmissionError::Schema(SchemaError::InvalidDomain("nowhere".to_string())))
        );
    }
}
