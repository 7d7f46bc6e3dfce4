use std::convert::TryInto;
use std::mem::size_of;

use super::error::Malformation;

///
/// Bounds-checked cursor over a single frame.
///
/// Every read either returns the requested bytes or a [`Malformation`]
/// describing what was missing; nothing here can index past the end of
/// the buffer.
///
pub(crate) struct FrameReader<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        FrameReader { bytes }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, Malformation> {
        let (first, rest) = self.bytes.split_first().ok_or(Malformation::Truncated {
            field,
            needed: 1,
            available: 0,
        })?;
        self.bytes = rest;
        Ok(*first)
    }

    pub fn read_flag(&mut self, field: &'static str) -> Result<bool, Malformation> {
        match self.read_u8(field)? {
            0 => Ok(false),
            1 => Ok(true),
            n => Err(Malformation::InvalidFlag(n)),
        }
    }

    pub fn read_u64(&mut self, field: &'static str) -> Result<u64, Malformation> {
        let bytes = self.take(field, size_of::<u64>() as u64)?;
        // take() returned exactly eight bytes
        let array: [u8; 8] = bytes.try_into().map_err(|_| Malformation::Truncated {
            field,
            needed: size_of::<u64>() as u64,
            available: bytes.len(),
        })?;
        Ok(u64::from_be_bytes(array))
    }

    pub fn take(&mut self, field: &'static str, len: u64) -> Result<&'a [u8], Malformation> {
        if len > self.bytes.len() as u64 {
            return Err(Malformation::Truncated {
                field,
                needed: len,
                available: self.bytes.len(),
            });
        }
        let (head, tail) = self.bytes.split_at(len as usize);
        self.bytes = tail;
        Ok(head)
    }

    /// A u64 length prefix followed by exactly that many bytes, which must
    /// also be the last bytes of the frame.
    pub fn read_trailing_prefixed(&mut self, field: &'static str) -> Result<&'a [u8], Malformation> {
        let declared = self.read_u64(field)?;
        if declared != self.bytes.len() as u64 {
            return Err(Malformation::LengthMismatch {
                field,
                declared,
                actual: self.bytes.len(),
            });
        }
        Ok(self.rest())
    }

    pub fn rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.bytes)
    }

    pub fn expect_end(&self) -> Result<(), Malformation> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(Malformation::TrailingBytes(n)),
        }
    }
}

/// Appends `bytes` prefixed with their length as a big-endian u64.
pub(crate) fn put_prefixed(vbytes: &mut Vec<u8>, bytes: &[u8]) {
    vbytes.extend(&(bytes.len() as u64).to_be_bytes());
    vbytes.extend(bytes);
}
