use super::{TopicManager, TopicMetadata, UHRP_TOPIC};
use crate::{
    config::UhrpConfig,
    coordinator::{AdmissionReport, decode_token, scan_outputs},
    errors::AdmissionResult,
    payload::ContentAdvertisement,
    schema,
};
use overlay_consensus_core::tx::PopulatedTransaction;
use overlay_keys::{Address, VerificationMode, parse_public_key, verify_fields_signature};
use overlay_txscript::PushDropToken;
use std::str::FromStr;

const DOCUMENTATION: &str = "# UHRP

UHRP (Universal Hash Resolution Protocol) tokens state that content identified by its SHA-256 hash is available at a URL until an expiry time, or revoke such a statement.

An output is admitted when:
- it is a PushDrop token with exactly seven fields: the UHRP protocol address, the advertiser's address, the 32 byte content hash, `advertise` or `revoke`, the URL, the expiry time and the content length;
- the URL starts with `https://`, contains a dot and no space;
- the expiry time is a unix timestamp between 1600000000 and 100000000000;
- the content length is a positive number of bytes no greater than 11000000000;
- the advertiser's address is the P2PKH address of the locking key;
- the signature over the concatenated fields verifies against the locking key.

Spent advertisements are never retained.
";

/// Admits UHRP content availability advertisements.
pub struct UhrpTopicManager {
    config: UhrpConfig,
    verification: VerificationMode,
}

impl UhrpTopicManager {
    pub fn new(config: UhrpConfig, verification: VerificationMode) -> Self {
        Self { config, verification }
    }

    fn verify(&self, token: &PushDropToken, advertisement: &ContentAdvertisement) -> AdmissionResult<()> {
        let locking_key = parse_public_key(&token.locking_public_key)?;
        if self.verification == VerificationMode::Strict {
            Address::from_str(&advertisement.advertiser_address)?.verify_public_key(&locking_key)?;
        }
        verify_fields_signature(&locking_key, &token.fields, &token.signature)?;
        Ok(())
    }
}

impl TopicManager for UhrpTopicManager {
    fn topic(&self) -> &'static str {
        UHRP_TOPIC
    }

    fn admit(&self, tx: &PopulatedTransaction, _previous_coins: &[u32]) -> AdmissionReport {
        let scan = scan_outputs(self.topic(), tx, |_, output| {
            let token = decode_token(output)?;
            let advertisement = schema::uhrp::parse(&token.fields, &self.config)?;
            self.verify(&token, &advertisement)?;
            Ok(Some(advertisement.into()))
        });
        AdmissionReport::new(self.topic(), tx, scan, vec![], vec![])
    }

    fn documentation(&self) -> &'static str {
        DOCUMENTATION
    }

    fn metadata(&self) -> TopicMetadata {
        TopicMetadata {
            name: "UHRP Topic Manager",
            short_description: "Manages UHRP tokens advertising where hashed content is hosted.",
            icon_url: None,
            version: None,
            information_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::UHRP_PROTOCOL_ADDRESS,
        errors::{AdmissionError, SchemaError},
    };
    use overlay_consensus_core::tx::{ScriptPublicKey, Transaction, TransactionOutput};
    use overlay_keys::{KeyError, Network, PublicKey, SecretKey, sign_fields};
    use overlay_txscript::{LockPosition, pushdrop::lock};
    use secp256k1::SECP256K1;

    fn fields(advertiser: &PublicKey, expiry: &[u8]) -> Vec<Vec<u8>> {
        vec![
            UHRP_PROTOCOL_ADDRESS.as_bytes().to_vec(),
            Address::from_public_key(advertiser, Network::Mainnet).to_string().into_bytes(),
            vec![0x5a; 32],
            b"advertise".to_vec(),
            b"https://cdn.example.com/file".to_vec(),
            expiry.to_vec(),
            b"2048".to_vec(),
        ]
    }

    fn token(signer: &SecretKey, fields: Vec<Vec<u8>>) -> TransactionOutput {
        let locking_key = PublicKey::from_secret_key(SECP256K1, signer);
        let script = lock(&fields, &locking_key.serialize(), &sign_fields(signer, &fields), LockPosition::Before).unwrap();
        TransactionOutput::new(1, ScriptPublicKey::new(script))
    }

    #[test]
    fn test_admit() {
        let signer = SecretKey::from_slice(&[0x22; 32]).unwrap();
        let other = PublicKey::from_secret_key(SECP256K1, &SecretKey::from_slice(&[0x33; 32]).unwrap());
        let key = PublicKey::from_secret_key(SECP256K1, &signer);

        let outputs = vec![
            token(&signer, fields(&key, b"1700000000")),
            token(&signer, fields(&key, b"1599999999")),
            // address of another key
            token(&signer, fields(&other, b"1700000000")),
        ];
        let tx = PopulatedTransaction::unpopulated(Transaction::new(1, vec![], outputs, 0));

        let strict = UhrpTopicManager::new(UhrpConfig::default(), VerificationMode::Strict).admit(&tx, &[0]);
        assert_eq!(strict.instructions.outputs_to_admit, vec![0]);
        assert!(strict.instructions.coins_to_retain.is_empty());
        assert!(matches!(strict.rejected[0].error, AdmissionError::Schema(SchemaError::ExpiryOutOfRange { value: 1_599_999_999, .. })));
        assert!(matches!(strict.rejected[1].error, AdmissionError::Provenance(KeyError::AddressMismatch { .. })));

        let loose = UhrpTopicManager::new(UhrpConfig::default(), VerificationMode::SignatureOnly).admit(&tx, &[0]);
        assert_eq!(loose.instructions.outputs_to_admit, vec![0, 2]);
    }

    #[test]
    fn test_testnet_address() {
        let signer = SecretKey::from_slice(&[0x22; 32]).unwrap();
        let key = PublicKey::from_secret_key(SECP256K1, &signer);
        let mut fields = fields(&key, b"1700000000");
        fields[1] = Address::from_public_key(&key, Network::Testnet).to_string().into_bytes();
        let tx = PopulatedTransaction::unpopulated(Transaction::new(1, vec![], vec![token(&signer, fields)], 0));

        let report = UhrpTopicManager::new(UhrpConfig::default(), VerificationMode::Strict).admit(&tx, &[]);
        assert_eq!(report.instructions.outputs_to_admit, vec![0]);
    }
}
