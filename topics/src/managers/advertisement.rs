use super::{SHIP_TOPIC, SLAP_TOPIC, TopicManager, TopicMetadata};
use crate::{
    coordinator::{AdmissionReport, decode_token, scan_outputs},
    payload::AdvertisementProtocol,
    schema,
};
use overlay_consensus_core::tx::PopulatedTransaction;
use overlay_keys::{VerificationMode, verify_token};

const SHIP_DOCUMENTATION: &str = "# SHIP

SHIP (Service Host Interconnect Protocol) tokens advertise that a host carries a topic, so peers can discover where to send and sync transactions.

An output is admitted when:
- it is a PushDrop token with exactly four fields: `SHIP`, the advertiser's identity key, the host domain and the topic name;
- the domain is an optional `http(s)://` scheme, dot separated labels ending with a label of two or more letters, and an optional path;
- the locking key is the BRC-42 child of the identity key for the BRC-43 invoice number `2-SHIP-1`;
- the signature over the concatenated fields verifies against the locking key.

Spent advertisements are never retained.
";

const SLAP_DOCUMENTATION: &str = "# SLAP

SLAP (Service Lookup Availability Protocol) tokens advertise that a host answers a lookup service, so clients can discover where to send their queries.

An output is admitted when:
- it is a PushDrop token with exactly four fields: `SLAP`, the advertiser's identity key, the host domain and the service name;
- the service name is 1 to 50 lower case letters or underscores, with no leading, trailing or doubled underscore;
- the locking key is the BRC-42 child of the identity key for the BRC-43 invoice number `2-SLAP-1`;
- the signature over the concatenated fields verifies against the locking key.

Spent advertisements are never retained.
";

/// Admits SHIP or SLAP advertisements.
pub struct AdvertisementTopicManager {
    protocol: AdvertisementProtocol,
    verification: VerificationMode,
}

impl AdvertisementTopicManager {
    pub fn new(protocol: AdvertisementProtocol, verification: VerificationMode) -> Self {
        Self { protocol, verification }
    }

    pub fn ship(verification: VerificationMode) -> Self {
        Self::new(AdvertisementProtocol::Ship, verification)
    }

    pub fn slap(verification: VerificationMode) -> Self {
        Self::new(AdvertisementProtocol::Slap, verification)
    }
}

impl TopicManager for AdvertisementTopicManager {
    fn topic(&self) -> &'static str {
        match self.protocol {
            AdvertisementProtocol::Ship => SHIP_TOPIC,
            AdvertisementProtocol::Slap => SLAP_TOPIC,
        }
    }

    fn admit(&self, tx: &PopulatedTransaction, _previous_coins: &[u32]) -> AdmissionReport {
        let scan = scan_outputs(self.topic(), tx, |_, output| {
            let token = decode_token(output)?;
            let advertisement = schema::advertisement::parse(self.protocol, &token.fields)?;
            verify_token(
                &token.fields[1],
                &token.locking_public_key,
                &token.fields,
                &token.signature,
                self.protocol.as_str(),
                self.verification,
            )?;
            Ok(Some(advertisement.into()))
        });
        AdmissionReport::new(self.topic(), tx, scan, vec![], vec![])
    }

    fn documentation(&self) -> &'static str {
        match self.protocol {
            AdvertisementProtocol::Ship => SHIP_DOCUMENTATION,
            AdvertisementProtocol::Slap => SLAP_DOCUMENTATION,
        }
    }

    fn metadata(&self) -> TopicMetadata {
        match self.protocol {
            AdvertisementProtocol::Ship => TopicMetadata {
                name: "SHIP Topic Manager",
                short_description: "Manages SHIP tokens for service host interconnect.",
                icon_url: None,
                version: None,
                information_url: None,
            },
            AdvertisementProtocol::Slap => TopicMetadata {
                name: "SLAP Topic Manager",
                short_description: "Manages SLAP tokens for service lookup availability.",
                icon_url: None,
                version: None,
                information_url: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        advertiser::create_advertisement,
        errors::{AdmissionError, SchemaError},
        payload::{Advertisement, ProtocolPayload},
    };
    use overlay_consensus_core::tx::{ScriptPublicKey, Transaction, TransactionOutput};
    use overlay_keys::{InvoiceNumber, KeyError, PublicKey, SecretKey, derive_anyone_secret_key, sign_fields};
    use overlay_txscript::{LockPosition, pushdrop::lock};
    use secp256k1::SECP256K1;

    fn identity_secret() -> SecretKey {
        SecretKey::from_slice(&[0x11; 32]).unwrap()
    }

    fn identity_key() -> PublicKey {
        PublicKey::from_secret_key(SECP256K1, &identity_secret())
    }

    fn transaction(scripts: Vec<Vec<u8>>) -> PopulatedTransaction {
        let outputs = scripts.into_iter().map(|script| TransactionOutput::new(1, ScriptPublicKey::new(script))).collect();
        PopulatedTransaction::unpopulated(Transaction::new(1, vec![], outputs, 0))
    }

    /// A token signed by `signer` and locked with its public key.
    fn signed_with(signer: &SecretKey, fields: Vec<Vec<u8>>) -> Vec<u8> {
        let locking_key = PublicKey::from_secret_key(SECP256K1, signer);
        lock(&fields, &locking_key.serialize(), &sign_fields(signer, &fields), LockPosition::Before).unwrap()
    }

    #[test]
    fn test_admit_slap() {
        let valid = create_advertisement(&identity_secret(), AdvertisementProtocol::Slap, "example.com", "search").unwrap();
        let capital = {
            let fields = vec![b"SLAP".to_vec(), identity_key().serialize().to_vec(), b"example.com".to_vec(), b"Search".to_vec()];
            let invoice = InvoiceNumber::admission("SLAP").unwrap();
            signed_with(&derive_anyone_secret_key(&identity_secret(), &invoice).unwrap(), fields)
        };
        let tx = transaction(vec![valid, capital, vec![0x6a, 0x01, 0x02]]);

        let report = AdvertisementTopicManager::slap(VerificationMode::Strict).admit(&tx, &[]);
        assert_eq!(report.instructions.outputs_to_admit, vec![0]);
        assert!(report.instructions.coins_to_retain.is_empty());
        assert_eq!(
            report.admitted[0].payload,
            Some(ProtocolPayload::Advertisement(Advertisement {
                protocol: AdvertisementProtocol::Slap,
                identity_key: identity_key().to_string(),
                domain: "example.com".to_string(),
                topic_or_service: "search".to_string(),
            }))
        );
        assert_eq!(report.rejected[0].error, AdmissionError::Schema(SchemaError::InvalidServiceName("Search".to_string())));
        assert!(matches!(report.rejected[1].error, AdmissionError::Decode(_)));
    }

    #[test]
    fn test_ship_does_not_admit_slap() {
        let slap = create_advertisement(&identity_secret(), AdvertisementProtocol::Slap, "example.com", "search").unwrap();
        let ship = create_advertisement(&identity_secret(), AdvertisementProtocol::Ship, "https://example.com", "tm_tokens").unwrap();
        let tx = transaction(vec![slap, ship]);

        let report = AdvertisementTopicManager::ship(VerificationMode::Strict).admit(&tx, &[]);
        assert_eq!(report.instructions.outputs_to_admit, vec![1]);
        assert_eq!(
            report.rejected[0].error,
            AdmissionError::Schema(SchemaError::ProtocolTag { expected: "SHIP", found: "SLAP".to_string() })
        );
    }

    #[test]
    fn test_underived_locking_key() {
        // Signed directly with the identity key instead of its derived child.
        let fields = vec![b"SHIP".to_vec(), identity_key().serialize().to_vec(), b"example.com".to_vec(), b"tm_tokens".to_vec()];
        let tx = transaction(vec![signed_with(&identity_secret(), fields)]);

        let strict = AdvertisementTopicManager::ship(VerificationMode::Strict).admit(&tx, &[]);
        assert!(strict.instructions.outputs_to_admit.is_empty());
        assert!(matches!(strict.rejected[0].error, AdmissionError::Provenance(KeyError::InvalidLockingKey { .. })));

        let loose = AdvertisementTopicManager::ship(VerificationMode::SignatureOnly).admit(&tx, &[]);
        assert_eq!(loose.instructions.outputs_to_admit, vec![0]);
    }

    #[test]
    fn test_tampered_field() {
        let invoice = InvoiceNumber::admission("SHIP").unwrap();
        let locking_secret = derive_anyone_secret_key(&identity_secret(), &invoice).unwrap();
        let locking_key = PublicKey::from_secret_key(SECP256K1, &locking_secret);
        let mut fields = vec![b"SHIP".to_vec(), identity_key().serialize().to_vec(), b"example.com".to_vec(), b"tm_tokens".to_vec()];
        let signature = sign_fields(&locking_secret, &fields);
        fields[3] = b"tm_other".to_vec();
        let script = lock(&fields, &locking_key.serialize(), &signature, LockPosition::After).unwrap();

        let report = AdvertisementTopicManager::ship(VerificationMode::Strict).admit(&transaction(vec![script]), &[]);
        assert_eq!(report.rejected[0].error, AdmissionError::Provenance(KeyError::InvalidSignature));
    }
}
