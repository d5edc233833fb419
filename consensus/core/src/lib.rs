//! Transaction model and envelope decoding for overlay admission.

pub mod envelope;
pub mod errors;
pub mod hashing;
pub mod merkle_path;
pub mod reader;
pub mod tx;

pub use envelope::{Beef, BeefTx, parse_envelope};
pub use errors::{EnvelopeError, EnvelopeResult};
