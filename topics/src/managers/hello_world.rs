use super::{HELLO_WORLD_TOPIC, TopicManager, TopicMetadata};
use crate::{
    config::HelloWorldConfig,
    coordinator::{AdmissionReport, decode_token, scan_outputs},
    payload::ProtocolPayload,
    schema,
};
use overlay_consensus_core::tx::PopulatedTransaction;
use overlay_keys::{parse_public_key, verify_fields_signature};

const DOCUMENTATION: &str = "# HelloWorld

HelloWorld tokens carry a short public message.

An output is admitted when it is a PushDrop token with a single UTF-8 field of at least two characters, signed by its locking key.
";

pub struct HelloWorldTopicManager {
    config: HelloWorldConfig,
}

impl HelloWorldTopicManager {
    pub fn new(config: HelloWorldConfig) -> Self {
        Self { config }
    }
}

impl TopicManager for HelloWorldTopicManager {
    fn topic(&self) -> &'static str {
        HELLO_WORLD_TOPIC
    }

    fn admit(&self, tx: &PopulatedTransaction, _previous_coins: &[u32]) -> AdmissionReport {
        let scan = scan_outputs(self.topic(), tx, |_, output| {
            let token = decode_token(output)?;
            let message = schema::hello_world::parse(&token.fields, &self.config)?;
            // The message names no identity, so only the signature is checked.
            verify_fields_signature(&parse_public_key(&token.locking_public_key)?, &token.fields, &token.signature)?;
            Ok(Some(ProtocolPayload::HelloWorldMessage { message }))
        });
        AdmissionReport::new(self.topic(), tx, scan, vec![], vec![])
    }

    fn documentation(&self) -> &'static str {
        DOCUMENTATION
    }

    fn metadata(&self) -> TopicMetadata {
        TopicMetadata {
            name: "HelloWorld Topic Manager",
            short_description: "Manages signed HelloWorld messages.",
            icon_url: None,
            version: None,
            information_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AdmissionError, SchemaError};
    use overlay_consensus_core::tx::{ScriptPublicKey, Transaction, TransactionOutput};
    use overlay_keys::{KeyError, PublicKey, SecretKey, sign_fields};
    use overlay_txscript::{LockPosition, pushdrop::lock};
    use secp256k1::SECP256K1;

    fn message(signer: &SecretKey, text: &str, signed_text: &str) -> TransactionOutput {
        let locking_key = PublicKey::from_secret_key(SECP256K1, signer);
        let signature = sign_fields(signer, &[signed_text.as_bytes().to_vec()]);
        let script = lock(&[text.as_bytes().to_vec()], &locking_key.serialize(), &signature, LockPosition::After).unwrap();
        TransactionOutput::new(1, ScriptPublicKey::new(script))
    }

    #[test]
    fn test_admit() {
        let signer = SecretKey::from_slice(&[0x44; 32]).unwrap();
        let outputs =
            vec![message(&signer, "Hello, world!", "Hello, world!"), message(&signer, "!", "!"), message(&signer, "Hello", "Goodbye")];
        let tx = PopulatedTransaction::unpopulated(Transaction::new(1, vec![], outputs, 0));

        let report = HelloWorldTopicManager::new(HelloWorldConfig::default()).admit(&tx, &[]);
        assert_eq!(report.instructions.outputs_to_admit, vec![0]);
        assert_eq!(report.admitted[0].payload, Some(ProtocolPayload::HelloWorldMessage { message: "Hello, world!".to_string() }));
        assert_eq!(report.rejected[0].error, AdmissionError::Schema(SchemaError::MessageTooShort { length: 1, min: 2 }));
        assert_eq!(report.rejected[1].error, AdmissionError::Provenance(KeyError::InvalidSignature));
    }
}
