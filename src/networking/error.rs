use thiserror::Error;

/// What exactly was wrong with a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformation {
    #[error("frame is empty")]
    EmptyFrame,

    #[error("unknown tag {0:#04x}")]
    UnknownTag(u8),

    #[error("reply SURB flag must be 0 or 1, got {0:#04x}")]
    InvalidFlag(u8),

    #[error("truncated {field}: needed {needed} bytes but only {available} remain")]
    Truncated {
        field: &'static str,
        needed: u64,
        available: usize,
    },

    #[error("{field} length mismatch: declared {declared} bytes but {actual} remain")]
    LengthMismatch {
        field: &'static str,
        declared: u64,
        actual: usize,
    },

    #[error("address must be {expected} bytes, got {actual}")]
    AddressLength { expected: usize, actual: usize },

    #[error("reply SURB must be {expected} bytes, got {declared}")]
    ReplySurbLength { expected: usize, declared: u64 },

    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

///
/// Failure to decode a single frame.
///
/// Decode failures are local and never worth retrying: the frame is dropped
/// and the error handed to the caller.
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed response: {0}")]
    MalformedResponse(Malformation),

    #[error("malformed request: {0}")]
    MalformedRequest(Malformation),

    #[error("unrecognized request tag {0:#04x}")]
    UnrecognizedRequestTag(u8),
}

impl DecodeError {
    pub fn malformation(&self) -> Option<&Malformation> {
        match self {
            DecodeError::MalformedResponse(malformation)
            | DecodeError::MalformedRequest(malformation) => Some(malformation),
            DecodeError::UnrecognizedRequestTag(_) => None,
        }
    }
}
