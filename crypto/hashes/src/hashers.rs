use crate::{HASH_SIZE, Hash};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub trait HasherBase {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self;
}

pub trait Hasher: HasherBase + Clone + Default {
    fn finalize(self) -> Hash;
    fn reset(&mut self);
    #[inline(always)]
    fn hash<A: AsRef<[u8]>>(data: A) -> Hash {
        let mut hasher = Self::default();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Double SHA-256, the hash used for transaction ids.
#[derive(Clone, Default)]
pub struct TransactionID(Sha256);

impl TransactionID {
    #[inline]
    pub fn new() -> Self {
        Self(Sha256::new())
    }
}

impl HasherBase for TransactionID {
    #[inline(always)]
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.0.update(data);
        self
    }
}

impl Hasher for TransactionID {
    #[inline(always)]
    fn finalize(self) -> Hash {
        let first = self.0.finalize();
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(&Sha256::digest(first));
        Hash::from_bytes(out)
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.0.reset();
    }
}

/// Single SHA-256, used as the message digest of token signatures.
#[derive(Clone, Default)]
pub struct MessageDigest(Sha256);

impl MessageDigest {
    #[inline]
    pub fn new() -> Self {
        Self(Sha256::new())
    }
}

impl HasherBase for MessageDigest {
    #[inline(always)]
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.0.update(data);
        self
    }
}

impl Hasher for MessageDigest {
    #[inline(always)]
    fn finalize(self) -> Hash {
        let mut out = [0u8; HASH_SIZE];
        out.copy_from_slice(&self.0.finalize());
        Hash::from_bytes(out)
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.0.reset();
    }
}

/// RIPEMD-160 of SHA-256, the payload of pay-to-public-key-hash addresses.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut out = [0u8; 20];
    out.copy_from_slice(&Ripemd160::digest(Sha256::digest(data)));
    out
}
