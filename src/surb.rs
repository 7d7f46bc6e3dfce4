/*!
# Reply SURBs

A reply SURB (single-use reply block) is a pre-built return path through the
mix network. Holding one lets an application answer the original sender
without ever learning the sender's address.

At this layer a SURB is an opaque blob:

- it is never parsed, split or mutated here;
- it arrives inside a `Received` response whose reply flag is set;
- it is consumed by exactly one `Reply` request.

[`ReplySurb`] is not `Clone`. Building a `Reply` request moves the
SURB into it, so the same value cannot be handed to a second reply. Exporting
the raw bytes with [`ReplySurb::into_bytes`] (to persist them, say) hands
that bookkeeping over to the caller. Nothing in the codec tracks which SURBs
were already spent.

*/
use std::fmt;

#[derive(PartialEq, Eq)]
pub struct ReplySurb {
    bytes: Vec<u8>,
}

impl ReplySurb {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ReplySurb { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw bytes, for embedding into a frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn from_hex(encoded: &str) -> Result<Self, hex::FromHexError> {
        Ok(ReplySurb::from_bytes(hex::decode(encoded.trim())?))
    }
}

// the contents are a capability, keep them out of logs
impl fmt::Debug for ReplySurb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReplySurb({} bytes)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak_contents() {
        let surb = ReplySurb::from_bytes(vec![0xAA, 0xBB, 0xCC]);
        let printed = format!("{:?}", surb);
        assert_eq!(printed, "ReplySurb(3 bytes)");
        assert!(!printed.to_lowercase().contains("aa"));
    }

    #[test]
    fn test_hex_export() {
        let surb = ReplySurb::from_bytes(vec![0xAA, 0xBB, 0xCC]);
        assert_eq!(surb.to_hex(), "aabbcc");
        assert_eq!(ReplySurb::from_hex(" aabbcc\n").unwrap(), surb);
        assert!(ReplySurb::from_hex("xyz").is_err());
    }

    #[test]
    fn test_empty_surb_is_representable() {
        let surb = ReplySurb::from_bytes(vec![]);
        assert!(surb.is_empty());
        assert_eq!(surb.len(), 0);
        assert_eq!(surb.into_bytes(), Vec::<u8>::new());
    }
}
