use super::{expect_field_count, text_field};
use crate::{config::HelloWorldConfig, errors::SchemaError};

/// Fields: `[message]`. Length is counted in characters.
pub fn parse(fields: &[Vec<u8>], config: &HelloWorldConfig) -> Result<String, SchemaError> {
    expect_field_count(fields, 1)?;
    let message = text_field(fields, 0)?;
    let length = message.chars().count();
    if length < config.min_message_length {
        return Err(SchemaError::MessageTooShort { length, min: config.min_message_length });
    }
    Ok(message.to_string())
}
