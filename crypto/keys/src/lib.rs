pub mod address;
pub mod derivation;
pub mod error;
pub mod invoice;
pub mod signing;

pub use address::{Address, Network};
pub use derivation::{derive_anyone_public_key, derive_anyone_secret_key, derive_child_public_key, derive_child_secret_key};
pub use error::{KeyError, KeyResult};
pub use invoice::InvoiceNumber;
pub use secp256k1::{PublicKey, SecretKey};
pub use signing::{VerificationMode, parse_public_key, sign_fields, verify_fields_signature, verify_locking_key, verify_token};
