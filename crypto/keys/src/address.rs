use crate::error::{KeyError, KeyResult};
use overlay_hashes::hash160;
use secp256k1::PublicKey;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x6f,
        }
    }

    fn from_p2pkh_version(version: u8) -> Option<Self> {
        match version {
            0x00 => Some(Network::Mainnet),
            0x6f => Some(Network::Testnet),
            _ => None,
        }
    }
}

/// Base58check pay-to-public-key-hash address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    pub network: Network,
    pub payload: [u8; 20],
}

impl Address {
    pub fn from_public_key(public_key: &PublicKey, network: Network) -> Self {
        Self { network, payload: hash160(&public_key.serialize()) }
    }

    /// Checks that this address pays to `public_key` on its own network.
    pub fn verify_public_key(&self, public_key: &PublicKey) -> KeyResult<()> {
        if Self::from_public_key(public_key, self.network) != *self {
            return Err(KeyError::AddressMismatch { address: self.to_string() });
        }
        Ok(())
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut bytes = Vec::with_capacity(21);
        bytes.push(self.network.p2pkh_version());
        bytes.extend_from_slice(&self.payload);
        f.write_str(&bs58::encode(bytes).with_check().into_string())
    }
}

impl FromStr for Address {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s).with_check(None).into_vec().map_err(|_| KeyError::InvalidAddress(s.to_string()))?;
        let (version, payload) = decoded.split_first().ok_or_else(|| KeyError::InvalidAddress(s.to_string()))?;
        let network = Network::from_p2pkh_version(*version).ok_or_else(|| KeyError::InvalidAddress(s.to_string()))?;
        let payload = payload.try_into().map_err(|_| KeyError::InvalidAddress(s.to_string()))?;
        Ok(Self { network, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{SECP256K1, SecretKey};

    fn key(byte: u8) -> PublicKey {
        let mut secret = [0u8; 32];
        secret[31] = byte;
        PublicKey::from_secret_key(SECP256K1, &SecretKey::from_slice(&secret).unwrap())
    }

    #[test]
    fn test_address_encoding() {
        struct Test {
            name: &'static str,
            network: Network,
            expected: &'static str,
        }

        let tests = vec![
            Test { name: "mainnet", network: Network::Mainnet, expected: "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH" },
            Test { name: "testnet", network: Network::Testnet, expected: "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r" },
        ];

        for test in tests {
            let address = Address::from_public_key(&key(1), test.network);
            assert_eq!(address.to_string(), test.expected, "{} encoding", test.name);
            assert_eq!(test.expected.parse::<Address>().unwrap(), address, "{} decoding", test.name);
            assert_eq!(address.verify_public_key(&key(1)), Ok(()), "{} binding", test.name);
            assert!(address.verify_public_key(&key(2)).is_err(), "{} foreign key", test.name);
        }
    }

    #[test]
    fn test_invalid_addresses() {
        for input in [
            "",
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMJ",
            "1UHRPYnMHPuQ5Tgb3AF8JXqwKkmZVy5hG0",
            "not an address",
            // valid base58check with an unknown version byte
            "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy",
        ] {
            assert!(input.parse::<Address>().is_err(), "{input} should not parse");
        }
    }
}
