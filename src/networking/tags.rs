use macros::TryFromByte;

/// First byte of every request frame.
#[repr(u8)]
#[derive(Debug, Copy, PartialEq, Eq, Clone, TryFromByte)]
pub enum RequestTag {
    Send = 0x00,
    Reply = 0x01,
    SelfAddress = 0x02,
}

/// First byte of every response frame.
#[repr(u8)]
#[derive(Debug, Copy, PartialEq, Eq, Clone, TryFromByte)]
pub enum ResponseTag {
    Error = 0x00,
    Received = 0x01,
    SelfAddress = 0x02,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_request_tags() {
        assert_eq!(RequestTag::try_from(0x00), Ok(RequestTag::Send));
        assert_eq!(RequestTag::try_from(0x01), Ok(RequestTag::Reply));
        assert_eq!(RequestTag::try_from(0x02), Ok(RequestTag::SelfAddress));
        assert_eq!(RequestTag::try_from(0x03), Err(0x03));
        assert_eq!(RequestTag::try_from(0xff), Err(0xff));
    }

    #[test]
    fn test_response_tags() {
        assert_eq!(ResponseTag::try_from(0x00), Ok(ResponseTag::Error));
        assert_eq!(ResponseTag::try_from(0x01), Ok(ResponseTag::Received));
        assert_eq!(ResponseTag::try_from(0x02), Ok(ResponseTag::SelfAddress));
        assert_eq!(ResponseTag::try_from(0x03), Err(0x03));
    }

    #[test]
    fn test_error_variant_converts() {
        // the derive must not clash with a variant called `Error`
        let tag: Result<ResponseTag, <ResponseTag as TryFrom<u8>>::Error> =
            ResponseTag::try_from(ResponseTag::Error as u8);
        assert_eq!(tag, Ok(ResponseTag::Error));
        assert_eq!(ResponseTag::try_from(0x10), Err(0x10u8));
    }
}
