use base58::{FromBase58, ToBase58};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::networking::error::Malformation;
use crate::params::{
    WireParams, ADDRESS_LEN, ENCRYPTION_KEY_LEN, IDENTITY_KEY_LEN, TAGGED_ADDRESS_LEN,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is malformed - {reason}")]
    Malformed { reason: String },

    #[error("{part} is not valid base58: {detail}")]
    InvalidBase58 { part: &'static str, detail: String },

    #[error("{part} must decode to {expected} bytes, got {actual}")]
    InvalidKeyLength {
        part: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("address is {actual} bytes but the configured layout needs {expected}")]
    UnexpectedLength { expected: usize, actual: usize },
}

///
/// Network address of a mixnet endpoint in its on-wire form.
///
/// The bytes are opaque to the protocol. For the canonical layout
/// (`client identity || client encryption key || gateway identity`) the
/// human-readable form is `identity.encryption@gateway`, each part base58.
///
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: Vec<u8>,
}

impl Address {
    pub fn new(
        client_identity: [u8; IDENTITY_KEY_LEN],
        client_encryption_key: [u8; ENCRYPTION_KEY_LEN],
        gateway_identity: [u8; IDENTITY_KEY_LEN],
    ) -> Self {
        let mut bytes = Vec::with_capacity(ADDRESS_LEN);
        bytes.extend(&client_identity);
        bytes.extend(&client_encryption_key);
        bytes.extend(&gateway_identity);
        Address { bytes }
    }

    /// Copies `bytes` into an address, provided they have the configured length.
    pub fn try_from_bytes(bytes: &[u8], params: &WireParams) -> Result<Self, Malformation> {
        params.check_address_len(bytes.len())?;
        Ok(Address {
            bytes: bytes.to_vec(),
        })
    }

    pub(crate) fn from_raw(bytes: Vec<u8>) -> Self {
        Address { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    ///
    /// Parses either human-readable form: `identity.encryption@gateway` for the
    /// 96-byte layout, or a single base58 string for the 97-byte tagged layout.
    ///
    pub fn try_from_base58_string(address: &str) -> Result<Self, AddressError> {
        if !address.contains('@') && !address.contains('.') {
            let decoded = address
                .from_base58()
                .map_err(|err| AddressError::InvalidBase58 {
                    part: "tagged address",
                    detail: format!("{:?}", err),
                })?;
            if decoded.len() != TAGGED_ADDRESS_LEN {
                return Err(AddressError::InvalidKeyLength {
                    part: "tagged address",
                    expected: TAGGED_ADDRESS_LEN,
                    actual: decoded.len(),
                });
            }
            return Ok(Address { bytes: decoded });
        }

        let (client_half, gateway_half) = split_once_exact(address, '@')?;
        let (identity_part, encryption_part) = split_once_exact(client_half, '.')?;

        let client_identity = decode_key::<IDENTITY_KEY_LEN>("client identity", identity_part)?;
        let client_encryption_key =
            decode_key::<ENCRYPTION_KEY_LEN>("client encryption key", encryption_part)?;
        let gateway_identity = decode_key::<IDENTITY_KEY_LEN>("gateway identity", gateway_half)?;

        Ok(Address::new(
            client_identity,
            client_encryption_key,
            gateway_identity,
        ))
    }

    /// Parses a human-readable address which must also fit the configured layout.
    pub fn parse_with(address: &str, params: &WireParams) -> Result<Self, AddressError> {
        let parsed = Address::try_from_base58_string(address)?;
        if parsed.len() != params.address_len() {
            return Err(AddressError::UnexpectedLength {
                expected: params.address_len(),
                actual: parsed.len(),
            });
        }
        Ok(parsed)
    }
}

fn split_once_exact(input: &str, separator: char) -> Result<(&str, &str), AddressError> {
    if input.matches(separator).count() != 1 {
        return Err(AddressError::Malformed {
            reason: format!(
                "the string address does not contain exactly a single '{}' character",
                separator
            ),
        });
    }
    input.split_once(separator).ok_or(AddressError::Malformed {
        reason: format!("missing '{}' separator", separator),
    })
}

fn decode_key<const N: usize>(part: &'static str, encoded: &str) -> Result<[u8; N], AddressError> {
    let decoded = encoded
        .from_base58()
        .map_err(|err| AddressError::InvalidBase58 {
            part,
            detail: format!("{:?}", err),
        })?;
    let mut key = [0u8; N];
    if decoded.len() != N {
        return Err(AddressError::InvalidKeyLength {
            part,
            expected: N,
            actual: decoded.len(),
        });
    }
    key.copy_from_slice(&decoded);
    Ok(key)
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address {
            bytes: bytes.to_vec(),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::try_from_base58_string(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bytes.len() != ADDRESS_LEN {
            return write!(f, "{}", self.bytes.to_base58());
        }
        let (identity, rest) = self.bytes.split_at(IDENTITY_KEY_LEN);
        let (encryption, gateway) = rest.split_at(ENCRYPTION_KEY_LEN);
        write!(
            f,
            "{}.{}@{}",
            identity.to_base58(),
            encryption.to_base58(),
            gateway.to_base58()
        )
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}
