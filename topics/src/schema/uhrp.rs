use super::{expect_field_count, integer_field, text_field};
use crate::{
    config::UhrpConfig,
    errors::SchemaError,
    payload::{ContentAdvertisement, UhrpOperation},
};
use overlay_keys::Address;
use std::str::FromStr;

/// `[protocolAddress, advertiserAddress, hash, operation, url, expiryTime, contentLength]`
pub const UHRP_FIELD_COUNT: usize = 7;
const HASH_LENGTH: usize = 32;
const URL_SCHEME: &str = "https://";

fn is_valid_url(url: &str) -> bool {
    url.starts_with(URL_SCHEME) && url.contains('.') && !url.contains(' ')
}

pub fn parse(fields: &[Vec<u8>], config: &UhrpConfig) -> Result<ContentAdvertisement, SchemaError> {
    expect_field_count(fields, UHRP_FIELD_COUNT)?;

    let protocol_address = text_field(fields, 0)?;
    if protocol_address != config.protocol_address {
        return Err(SchemaError::ProtocolAddress(protocol_address.to_string()));
    }

    let advertiser_address = text_field(fields, 1)?;
    Address::from_str(advertiser_address).map_err(|_| SchemaError::InvalidAddress(advertiser_address.to_string()))?;

    let hash: [u8; HASH_LENGTH] = fields[2].as_slice().try_into().map_err(|_| SchemaError::HashLength(fields[2].len()))?;

    let operation = text_field(fields, 3)?;
    let operation = UhrpOperation::from_str(operation).map_err(|_| SchemaError::InvalidOperation(operation.to_string()))?;

    let url = text_field(fields, 4)?;
    if !is_valid_url(url) {
        return Err(SchemaError::InvalidUrl(url.to_string()));
    }

    let expiry_time = integer_field(fields, 5)?;
    if !(config.min_expiry_time..=config.max_expiry_time).contains(&expiry_time) {
        return Err(SchemaError::ExpiryOutOfRange { value: expiry_time, min: config.min_expiry_time, max: config.max_expiry_time });
    }

    let content_length = integer_field(fields, 6)?;
    if content_length == 0 || content_length > config.max_content_length {
        return Err(SchemaError::ContentLengthOutOfRange { value: content_length, max: config.max_content_length });
    }

    Ok(ContentAdvertisement {
        protocol_address: protocol_address.to_string(),
        advertiser_address: advertiser_address.to_string(),
        hash,
        operation,
        url: url.to_string(),
        expiry_time,
        content_length,
    })
}
