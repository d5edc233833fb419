//! Admission rules of the overlay topics.
//!
//! Each topic manager decides, for one transaction, which outputs enter the topic and which
//! previously tracked coins it keeps tracking. Managers are pure: they read the transaction
//! and the indices of its inputs that spend tracked coins, and nothing else.

pub mod advertiser;
pub mod config;
pub mod conservation;
pub mod coordinator;
pub mod errors;
pub mod managers;
pub mod payload;
pub mod registry;
pub mod schema;

pub use advertiser::create_advertisement;
pub use config::AdmissionConfig;
pub use coordinator::{AdmissionReport, AdmittanceInstructions, AdmittedOutput, CoinRejection, OutputRejection};
pub use errors::{AdmissionError, AdmissionResult, ConfigError, ConservationError, SchemaError};
pub use managers::{TopicManager, TopicMetadata};
pub use payload::ProtocolPayload;
pub use registry::TopicRegistry;
