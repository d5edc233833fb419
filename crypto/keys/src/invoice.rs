use crate::error::{KeyError, KeyResult};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Security level used for every key the admission rules derive.
pub const ADMISSION_SECURITY_LEVEL: u8 = 2;
/// Key id used for every key the admission rules derive.
pub const ADMISSION_KEY_ID: &str = "1";

/// A `<securityLevel>-<protocolID>-<keyID>` invoice number labelling a derived key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InvoiceNumber {
    security_level: u8,
    protocol_id: String,
    key_id: String,
}

impl InvoiceNumber {
    pub fn new(security_level: u8, protocol_id: &str, key_id: &str) -> KeyResult<Self> {
        let invoice = Self { security_level, protocol_id: protocol_id.to_string(), key_id: key_id.to_string() };
        if security_level > 2 || protocol_id.is_empty() || protocol_id.contains('-') || key_id.is_empty() {
            return Err(KeyError::InvalidInvoiceNumber(invoice.to_string()));
        }
        Ok(invoice)
    }

    /// The invoice number advertisement locking keys are derived with, e.g. `2-SHIP-1`.
    pub fn admission(protocol_id: &str) -> KeyResult<Self> {
        Self::new(ADMISSION_SECURITY_LEVEL, protocol_id, ADMISSION_KEY_ID)
    }

    pub fn security_level(&self) -> u8 {
        self.security_level
    }

    pub fn protocol_id(&self) -> &str {
        &self.protocol_id
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl Display for InvoiceNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.security_level, self.protocol_id, self.key_id)
    }
}

impl FromStr for InvoiceNumber {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The key id may itself contain dashes, the protocol id may not.
        let mut parts = s.splitn(3, '-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(level), Some(protocol_id), Some(key_id)) => {
                let security_level = level.parse().map_err(|_| KeyError::InvalidInvoiceNumber(s.to_string()))?;
                Self::new(security_level, protocol_id, key_id)
            }
            _ => Err(KeyError::InvalidInvoiceNumber(s.to_string())),
        }
    }
}
