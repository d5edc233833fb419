//! Fixed keys, token outputs and envelopes shared by the integration tests.

use overlay_consensus_core::{
    Beef, BeefTx,
    envelope::{BEEF_V1, BEEF_V2},
    hashing::tx::serialize_extended,
    merkle_path::{MerklePath, PathLeaf},
    tx::{
        PopulatedTransaction, ScriptPublicKey, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput,
        UtxoEntry,
    },
};
use overlay_keys::{Address, InvoiceNumber, Network, PublicKey, SecretKey, derive_anyone_secret_key, sign_fields};
use overlay_topics::{
    config::UHRP_PROTOCOL_ADDRESS,
    payload::AdvertisementProtocol,
};
use overlay_txscript::{LockPosition, pushdrop::lock};
use secp256k1::SECP256K1;

/// Identity of the advertiser in every advertisement fixture.
pub const IDENTITY_SECRET: [u8; 32] = [0x11; 32];
/// Key locking the token and message fixtures.
pub const TOKEN_SECRET: [u8; 32] = [0x22; 32];

pub fn secret(bytes: [u8; 32]) -> SecretKey {
    SecretKey::from_slice(&bytes).unwrap()
}

pub fn public(bytes: [u8; 32]) -> PublicKey {
    PublicKey::from_secret_key(SECP256K1, &secret(bytes))
}

pub fn to_fields(fields: &[&[u8]]) -> Vec<Vec<u8>> {
    fields.iter().map(|field| field.to_vec()).collect()
}

/// A PushDrop output over `fields`, signed with `signer` and locked with its public key.
pub fn signed_output(signer: &SecretKey, fields: Vec<Vec<u8>>, position: LockPosition) -> TransactionOutput {
    let locking_key = PublicKey::from_secret_key(SECP256K1, signer);
    let script = lock(&fields, &locking_key.serialize(), &sign_fields(signer, &fields), position).unwrap();
    TransactionOutput::new(1, ScriptPublicKey::new(script))
}

/// A fungible token output.
pub fn token_output(fields: &[&[u8]]) -> TransactionOutput {
    signed_output(&secret(TOKEN_SECRET), to_fields(fields), LockPosition::Before)
}

/// An advertisement locked with the key derived from the identity, whatever its fields.
pub fn advertisement_output(protocol: AdvertisementProtocol, domain: &str, topic_or_service: &str) -> TransactionOutput {
    let identity = secret(IDENTITY_SECRET);
    let fields = vec![
        protocol.as_str().as_bytes().to_vec(),
        public(IDENTITY_SECRET).serialize().to_vec(),
        domain.as_bytes().to_vec(),
        topic_or_service.as_bytes().to_vec(),
    ];
    let locking_secret = derive_anyone_secret_key(&identity, &InvoiceNumber::admission(protocol.as_str()).unwrap()).unwrap();
    signed_output(&locking_secret, fields, LockPosition::Before)
}

/// A UHRP advertisement by the owner of the token key.
pub fn uhrp_output(expiry_time: u64, content_length: u64) -> TransactionOutput {
    let advertiser = Address::from_public_key(&public(TOKEN_SECRET), Network::Mainnet);
    let fields = vec![
        UHRP_PROTOCOL_ADDRESS.as_bytes().to_vec(),
        advertiser.to_string().into_bytes(),
        vec![0xc3; 32],
        b"advertise".to_vec(),
        b"https://files.example.com/c3c3".to_vec(),
        expiry_time.to_string().into_bytes(),
        content_length.to_string().into_bytes(),
    ];
    signed_output(&secret(TOKEN_SECRET), fields, LockPosition::Before)
}

/// A transaction with no known ancestry, spending an arbitrary coin.
pub fn funding_tx(outputs: Vec<TransactionOutput>) -> Transaction {
    let coin = TransactionOutpoint::new(TransactionId::from_bytes([0xf0; 32]), 0);
    Transaction::new(1, vec![TransactionInput::new(coin, vec![0x51], u32::MAX)], outputs, 0)
}

pub fn spending_tx(spent: &[TransactionOutpoint], outputs: Vec<TransactionOutput>) -> Transaction {
    let inputs = spent.iter().map(|outpoint| TransactionInput::new(*outpoint, vec![], u32::MAX)).collect();
    Transaction::new(1, inputs, outputs, 0)
}

/// A single-leaf merkle path proving `tx`.
pub fn merkle_path(tx: &Transaction) -> MerklePath {
    MerklePath {
        block_height: 850_000,
        path: vec![vec![
            PathLeaf { offset: 0, hash: Some(tx.id()), txid: true },
            PathLeaf { offset: 1, hash: None, txid: false },
        ]],
    }
}

/// BEEF of `txs` (parents first). The first one is proven by a merkle path.
pub fn beef(version: u32, txs: &[&Transaction]) -> Vec<u8> {
    let transactions = txs
        .iter()
        .enumerate()
        .map(|(i, tx)| BeefTx::Full { tx: (*tx).clone(), bump_index: (i == 0).then_some(0) })
        .collect();
    Beef { version, bumps: vec![merkle_path(txs[0])], transactions, atomic_txid: None }.to_bytes()
}

pub fn beef_v1(txs: &[&Transaction]) -> Vec<u8> {
    beef(BEEF_V1, txs)
}

pub fn beef_v2(txs: &[&Transaction]) -> Vec<u8> {
    beef(BEEF_V2, txs)
}

/// Atomic BEEF naming `subject`, with the subject listed first.
pub fn atomic_beef(subject: &Transaction, ancestors: &[&Transaction]) -> Vec<u8> {
    let mut transactions = vec![BeefTx::Full { tx: subject.clone(), bump_index: None }];
    transactions.extend(ancestors.iter().map(|tx| BeefTx::Full { tx: (*tx).clone(), bump_index: None }));
    Beef { version: BEEF_V2, bumps: vec![], transactions, atomic_txid: Some(subject.id()) }.to_bytes()
}

/// Extended format serialization of `tx`, whose inputs spend the outputs of `sources`.
pub fn extended(tx: &Transaction, sources: &[&Transaction]) -> Vec<u8> {
    let entries = tx
        .inputs
        .iter()
        .map(|input| {
            let source = sources.iter().find(|source| source.id() == input.previous_outpoint.transaction_id)?;
            let output = source.outputs.get(input.previous_outpoint.index as usize)?;
            Some(UtxoEntry::new(output.value, output.script_public_key.clone()))
        })
        .collect();
    serialize_extended(&PopulatedTransaction::new(tx.clone(), entries)).unwrap()
}
