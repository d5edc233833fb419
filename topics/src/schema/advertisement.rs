use super::{expect_field_count, text_field};
use crate::{
    errors::SchemaError,
    payload::{Advertisement, AdvertisementProtocol},
};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ADVERTISEMENT_FIELD_COUNT: usize = 4;
const MAX_SERVICE_NAME_LENGTH: usize = 50;

static DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?((([a-zA-Z0-9-]+)\.)+([a-zA-Z]{2,})|localhost(:[0-9]+))(/.*)?$").expect("valid domain regex")
});

static SERVICE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_]+$").expect("valid service name regex"));

/// Optional `http(s)://` scheme, dot separated labels ending with an alphabetic label of two or
/// more letters (or `localhost:<port>`), then an optional path.
pub fn is_valid_domain(domain: &str) -> bool {
    DOMAIN_REGEX.is_match(domain)
}

/// Lower case letters and single underscores, neither leading nor trailing, at most 50 characters.
pub fn is_valid_service_name(service: &str) -> bool {
    (1..=MAX_SERVICE_NAME_LENGTH).contains(&service.len())
        && SERVICE_NAME_REGEX.is_match(service)
        && !service.starts_with('_')
        && !service.ends_with('_')
        && !service.contains("__")
}

/// Fields: `[tag, identityKey, domain, topicOrService]`.
///
/// SHIP advertisements must name a well-formed domain, SLAP advertisements a well-formed
/// service name. The other text field is free-form.
pub fn parse(protocol: AdvertisementProtocol, fields: &[Vec<u8>]) -> Result<Advertisement, SchemaError> {
    expect_field_count(fields, ADVERTISEMENT_FIELD_COUNT)?;
    if fields[0] != protocol.as_str().as_bytes() {
        return Err(SchemaError::ProtocolTag { expected: protocol.as_str(), found: String::from_utf8_lossy(&fields[0]).into_owned() });
    }
    let domain = text_field(fields, 2)?;
    let topic_or_service = text_field(fields, 3)?;
    match protocol {
        AdvertisementProtocol::Ship if !is_valid_domain(domain) => return Err(SchemaError::InvalidDomain(domain.to_string())),
        AdvertisementProtocol::Slap if !is_valid_service_name(topic_or_service) => {
            return Err(SchemaError::InvalidServiceName(topic_or_service.to_string()));
        }
        _ => {}
    }
    Ok(Advertisement {
        protocol,
        identity_key: faster_hex::hex_string(&fields[1]),
        domain: domain.to_string(),
        topic_or_service: topic_or_service.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_domain() {
        let valid = ["example.com", "https://overlay.example.com", "http://a-b.example.org/path/x", "localhost:8080", "https://localhost:3000/"];
        let invalid = ["", "localhost", "example", "example.c", "ftp://example.com", "exa mple.com", "example.com:8080", "https://"];
        for domain in valid {
            assert!(is_valid_domain(domain), "{domain} should be valid");
        }
        for domain in invalid {
            assert!(!is_valid_domain(domain), "{domain} should be invalid");
        }
    }

    #[test]
    fn test_is_valid_service_name() {
        let long = "a".repeat(50);
        let too_long = "a".repeat(51);
        let valid = ["search", "ls_uhrp", "a", "a_b_c", long.as_str()];
        let invalid = ["", "Search", "_search", "search_", "ls__uhrp", "ls-uhrp", "ls1", too_long.as_str()];
        for service in valid {
            assert!(is_valid_service_name(service), "{service} should be valid");
        }
        for service in invalid {
            assert!(!is_valid_service_name(service), "{service} should be invalid");
        }
    }

    #[test]
    fn test_parse() {
        struct Test {
            name: &'static str,
            protocol: AdvertisementProtocol,
            fields: Vec<&'static [u8]>,
            expected: Result<(&'static str, &'static str), SchemaError>,
        }

        let tests = vec![
            Test {
                name: "ship",
                protocol: AdvertisementProtocol::Ship,
                fields: vec![b"SHIP", &[0x02, 0xab], b"https://overlay.example.com", b"tm_tokens"],
                expected: Ok(("https://overlay.example.com", "tm_tokens")),
            },
            Test {
                name: "slap with unchecked domain",
                protocol: AdvertisementProtocol::Slap,
                fields: vec![b"SLAP", &[0x02, 0xab], b"not a domain", b"ls_tokens"],
                expected: Ok(("not a domain", "ls_tokens")),
            },
            Test {
                name: "ship with free-form topic",
                protocol: AdvertisementProtocol::Ship,
                fields: vec![b"SHIP", &[0x02, 0xab], b"example.com", b"Any Topic!"],
                expected: Ok(("example.com", "Any Topic!")),
            },
            Test {
                name: "too few fields",
                protocol: AdvertisementProtocol::Ship,
                fields: vec![b"SHIP", &[0x02, 0xab], b"example.com"],
                expected: Err(SchemaError::FieldCount { expected: 4, found: 3 }),
            },
            Test {
                name: "too many fields",
                protocol: AdvertisementProtocol::Slap,
                fields: vec![b"SLAP", &[0x02, 0xab], b"example.com", b"search", b"extra"],
                expected: Err(SchemaError::FieldCount { expected: 4, found: 5 }),
            },
            Test {
                name: "wrong tag",
                protocol: AdvertisementProtocol::Ship,
                fields: vec![b"SLAP", &[0x02, 0xab], b"example.com", b"tm_tokens"],
                expected: Err(SchemaError::ProtocolTag { expected: "SHIP", found: "SLAP".to_string() }),
            },
            Test {
                name: "bad domain",
                protocol: AdvertisementProtocol::Ship,
                fields: vec![b"SHIP", &[0x02, 0xab], b"example", b"tm_tokens"],
                expected: Err(SchemaError::InvalidDomain("example".to_string())),
            },
            Test {
                name: "bad service",
                protocol: AdvertisementProtocol::Slap,
                fields: vec![b"SLAP", &[0x02, 0xab], b"example.com", b"Search"],
                expected: Err(SchemaError::InvalidServiceName("Search".to_string())),
            },
            Test {
                name: "binary domain",
                protocol: AdvertisementProtocol::Ship,
                fields: vec![b"SHIP", &[0x02, 0xab], &[0xff, 0xfe], b"tm_tokens"],
                expected: Err(SchemaError::NotUtf8(2)),
            },
        ];

        for test in tests {
            let fields = test.fields.iter().map(|field| field.to_vec()).collect::<Vec<_>>();
            let result = parse(test.protocol, &fields);
            match test.expected {
                Ok((domain, topic_or_service)) => {
                    let advertisement = result.unwrap_or_else(|err| panic!("{}: unexpected error {err}", test.name));
                    assert_eq!(advertisement.protocol, test.protocol, "{} wrong protocol", test.name);
                    assert_eq!(advertisement.identity_key, "02ab", "{} wrong identity key", test.name);
                    assert_eq!(advertisement.domain, domain, "{} wrong domain", test.name);
                    assert_eq!(advertisement.topic_or_service, topic_or_service, "{} wrong topic", test.name);
                }
                Err(expected) => assert_eq!(result, Err(expected), "{} wrong result", test.name),
            }
        }
    }
}
