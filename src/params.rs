//! Pinned wire parameters.
//!
//! Addresses and reply SURBs are opaque at the protocol boundary, but their
//! sizes follow from the key and packet sizes of the mix network. The
//! constants below pin those sizes; [`WireParams`] carries the subset a
//! codec needs to validate frames.

use crate::networking::error::Malformation;

/// ed25519 identity key of a client or gateway.
pub const IDENTITY_KEY_LEN: usize = 32;
/// x25519 encryption key of a client.
pub const ENCRYPTION_KEY_LEN: usize = 32;

/// client identity || client encryption key || gateway identity
pub const ADDRESS_LEN: usize = IDENTITY_KEY_LEN + ENCRYPTION_KEY_LEN + IDENTITY_KEY_LEN;
/// Address revision which prefixes the key triple with a single revision byte.
pub const TAGGED_ADDRESS_LEN: usize = ADDRESS_LEN + 1;

/// Symmetric key the SURB creator uses to decrypt the reply.
pub const SURB_ENCRYPTION_KEY_LEN: usize = 32;
/// Address of the first mix node on the reply path.
pub const FIRST_HOP_ADDRESS_LEN: usize = 32;
/// Sphinx header for the maximum supported path length.
pub const SPHINX_HEADER_LEN: usize = 348;
/// Per-hop payload key carried inside the SURB.
pub const PAYLOAD_KEY_LEN: usize = 192;

pub const DEFAULT_NUM_MIX_HOPS: u8 = 3;

/// Serialized length of a reply SURB built for `num_hops` mix hops.
pub const fn reply_surb_len(num_hops: u8) -> usize {
    SURB_ENCRYPTION_KEY_LEN
        + FIRST_HOP_ADDRESS_LEN
        + SPHINX_HEADER_LEN
        + PAYLOAD_KEY_LEN * num_hops as usize
}

///
/// Sizes a codec validates frames against.
///
/// `address_len` is always fixed. `reply_surb_len` is `None` when SURBs are
/// accepted at whatever length their prefix declares, or `Some(len)` to reject
/// every other length.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireParams {
    address_len: usize,
    reply_surb_len: Option<usize>,
}

impl Default for WireParams {
    fn default() -> Self {
        WireParams {
            address_len: ADDRESS_LEN,
            reply_surb_len: None,
        }
    }
}

impl WireParams {
    pub fn new(address_len: usize, reply_surb_len: Option<usize>) -> Self {
        WireParams {
            address_len,
            reply_surb_len,
        }
    }

    /// Same parameters, with addresses of `address_len` bytes.
    pub fn with_address_len(self, address_len: usize) -> Self {
        WireParams {
            address_len,
            ..self
        }
    }

    /// Same parameters, rejecting SURBs which are not exactly `len` bytes.
    pub fn with_fixed_reply_surb_len(self, len: usize) -> Self {
        WireParams {
            reply_surb_len: Some(len),
            ..self
        }
    }

    /// Same parameters, with the SURB length pinned to the one derived for `num_hops`.
    pub fn with_reply_surbs_for_hops(self, num_hops: u8) -> Self {
        self.with_fixed_reply_surb_len(reply_surb_len(num_hops))
    }

    pub fn address_len(&self) -> usize {
        self.address_len
    }

    pub fn reply_surb_len(&self) -> Option<usize> {
        self.reply_surb_len
    }

    pub(crate) fn check_address_len(&self, actual: usize) -> Result<(), Malformation> {
        if actual != self.address_len {
            return Err(Malformation::AddressLength {
                expected: self.address_len,
                actual,
            });
        }
        Ok(())
    }

    pub(crate) fn check_reply_surb_len(&self, declared: u64) -> Result<(), Malformation> {
        match self.reply_surb_len {
            Some(expected) if declared != expected as u64 => Err(Malformation::ReplySurbLength {
                expected,
                declared,
            }),
            _ => Ok(()),
        }
    }
}
