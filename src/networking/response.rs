use std::convert::TryFrom;

use crate::address::Address;
use crate::params::WireParams;
use crate::surb::ReplySurb;

use super::error::{DecodeError, Malformation};
use super::frame::{put_prefixed, FrameReader};
use super::tags::ResponseTag;

///
/// A message delivered to us through the mix network.
///
/// `reply_surb` is present only when the sender asked for one. Messages which
/// are themselves replies never carry a SURB, since replies cannot be replied to.
///
#[derive(Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message: Vec<u8>,
    pub reply_surb: Option<ReplySurb>,
}

impl ReceivedMessage {
    pub fn new(message: Vec<u8>, reply_surb: Option<ReplySurb>) -> Self {
        ReceivedMessage {
            message,
            reply_surb,
        }
    }
}

///
/// A response from the mixnet client to the application.
///
#[derive(Debug, PartialEq, Eq)]
pub enum ServerResponse {
    Error { description: Vec<u8> },
    Received(ReceivedMessage),
    SelfAddress { address: Address },
}

impl ServerResponse {
    pub fn error<S: Into<String>>(description: S) -> Self {
        ServerResponse::Error {
            description: description.into().into_bytes(),
        }
    }

    pub fn tag(&self) -> ResponseTag {
        match self {
            ServerResponse::Error { .. } => ResponseTag::Error,
            ServerResponse::Received(_) => ResponseTag::Received,
            ServerResponse::SelfAddress { .. } => ResponseTag::SelfAddress,
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut vbytes: Vec<u8> = vec![self.tag() as u8];
        match self {
            // ERROR || description
            ServerResponse::Error { description } => vbytes.extend(description),
            // RECEIVED || with_reply_surb || (surb_len || surb) || message_len || message
            ServerResponse::Received(received) => {
                vbytes.push(received.reply_surb.is_some() as u8);
                if let Some(reply_surb) = &received.reply_surb {
                    put_prefixed(&mut vbytes, reply_surb.as_bytes());
                }
                put_prefixed(&mut vbytes, &received.message);
            }
            // SELF_ADDRESS || address
            ServerResponse::SelfAddress { address } => vbytes.extend(address.as_bytes()),
        }
        vbytes
    }

    ///
    /// Parses one complete response frame.
    ///
    /// Every length field is checked against what is actually left in the
    /// frame, so a truncated or padded frame is rejected instead of being
    /// silently misread.
    ///
    pub fn deserialize(bytes: &[u8], params: &WireParams) -> Result<ServerResponse, DecodeError> {
        let mut reader = FrameReader::new(bytes);
        let response = match reader.read_u8("response tag") {
            Err(_) => Err(Malformation::EmptyFrame),
            Ok(tag) => match ResponseTag::try_from(tag) {
                Err(tag) => Err(Malformation::UnknownTag(tag)),
                Ok(ResponseTag::Error) => Ok(ServerResponse::Error {
                    description: reader.rest().to_vec(),
                }),
                Ok(ResponseTag::Received) => Self::deserialize_received(reader, params),
                Ok(ResponseTag::SelfAddress) => {
                    Address::try_from_bytes(reader.rest(), params)
                        .map(|address| ServerResponse::SelfAddress { address })
                }
            },
        };
        response.map_err(DecodeError::MalformedResponse)
    }

    fn deserialize_received(
        mut reader: FrameReader<'_>,
        params: &WireParams,
    ) -> Result<ServerResponse, Malformation> {
        let with_reply_surb = reader.read_flag("reply SURB flag")?;
        let reply_surb = if with_reply_surb {
            let reply_surb_len = reader.read_u64("reply SURB length")?;
            params.check_reply_surb_len(reply_surb_len)?;
            let reply_surb = reader.take("reply SURB", reply_surb_len)?;
            Some(ReplySurb::from_bytes(reply_surb.to_vec()))
        } else {
            None
        };
        let message = reader.read_trailing_prefixed("message")?;

        Ok(ServerResponse::Received(ReceivedMessage {
            message: message.to_vec(),
            reply_surb,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{reply_surb_len, ADDRESS_LEN, DEFAULT_NUM_MIX_HOPS, TAGGED_ADDRESS_LEN};
    use rand::{Rng, RngCore};

    fn decode(bytes: &[u8]) -> Result<ServerResponse, DecodeError> {
        ServerResponse::deserialize(bytes, &WireParams::default())
    }

    fn malformed(result: Result<ServerResponse, DecodeError>) -> Malformation {
        match result {
            Err(DecodeError::MalformedResponse(malformation)) => malformation,
            other => panic!("expected a malformed response, got {:?}", other),
        }
    }

    #[test]
    fn test_self_address_response_deserialize() {
        let mut frame = vec![0x02];
        frame.extend((0..TAGGED_ADDRESS_LEN as u8).collect::<Vec<u8>>());
        let params = WireParams::default().with_address_len(TAGGED_ADDRESS_LEN);

        match ServerResponse::deserialize(&frame, &params).unwrap() {
            ServerResponse::SelfAddress { address } => {
                assert_eq!(address.as_bytes(), &frame[1..]);
                assert_eq!(address.len(), 97);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_self_address_response_requires_exact_length() {
        let mut frame = vec![0x02];
        frame.extend(&[5u8; ADDRESS_LEN]);
        assert!(decode(&frame).is_ok());

        frame.push(0);
        assert_eq!(
            malformed(decode(&frame)),
            Malformation::AddressLength {
                expected: ADDRESS_LEN,
                actual: ADDRESS_LEN + 1
            }
        );
        assert_eq!(
            malformed(decode(&[0x02])),
            Malformation::AddressLength {
                expected: ADDRESS_LEN,
                actual: 0
            }
        );
    }

    #[test]
    fn test_received_with_surb_deserialize() {
        let frame = vec![
            0x01, 0x01, 0, 0, 0, 0, 0, 0, 0, 3, 0xAA, 0xBB, 0xCC, 0, 0, 0, 0, 0, 0, 0, 1, 0x41,
        ];
        assert_eq!(
            decode(&frame).unwrap(),
            ServerResponse::Received(ReceivedMessage::new(
                b"A".to_vec(),
                Some(ReplySurb::from_bytes(vec![0xAA, 0xBB, 0xCC]))
            ))
        );
    }

    #[test]
    fn test_received_without_surb_deserialize() {
        let frame = vec![0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 2, 0x41, 0x42];
        assert_eq!(
            decode(&frame).unwrap(),
            ServerResponse::Received(ReceivedMessage::new(b"AB".to_vec(), None))
        );

        let empty = vec![0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            decode(&empty).unwrap(),
            ServerResponse::Received(ReceivedMessage::new(vec![], None))
        );
    }

    #[test]
    fn test_received_invalid_flag() {
        let frame = vec![0x01, 0x02, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(malformed(decode(&frame)), Malformation::InvalidFlag(2));
    }

    #[test]
    fn test_received_declared_length_disagrees() {
        let frame = vec![0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 5, 0x41, 0x42];
        assert_eq!(
            malformed(decode(&frame)),
            Malformation::LengthMismatch {
                field: "message",
                declared: 5,
                actual: 2
            }
        );

        // more bytes than declared is just as wrong
        let frame = vec![0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 1, 0x41, 0x42];
        assert!(matches!(
            malformed(decode(&frame)),
            Malformation::LengthMismatch { .. }
        ));
    }

    #[test]
    fn test_received_surb_length_past_end_of_frame() {
        let mut frame = vec![0x01, 0x01];
        frame.extend(&u64::MAX.to_be_bytes());
        frame.extend(&[1, 2, 3]);
        assert_eq!(
            malformed(decode(&frame)),
            Malformation::Truncated {
                field: "reply SURB",
                needed: u64::MAX,
                available: 3
            }
        );
    }

    #[test]
    fn test_received_empty_surb() {
        let frame = vec![
            0x01, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0x41,
        ];
        match decode(&frame).unwrap() {
            ServerResponse::Received(received) => {
                assert_eq!(received.message, b"A".to_vec());
                assert_eq!(received.reply_surb.map(|surb| surb.len()), Some(0));
            }
            other => panic!("unexpected response {:?}", other),
        }

        let pinned = WireParams::default().with_reply_surbs_for_hops(DEFAULT_NUM_MIX_HOPS);
        assert_eq!(
            ServerResponse::deserialize(&frame, &pinned),
            Err(DecodeError::MalformedResponse(
                Malformation::ReplySurbLength {
                    expected: reply_surb_len(DEFAULT_NUM_MIX_HOPS),
                    declared: 0
                }
            ))
        );
    }

    #[test]
    fn test_error_response_is_always_decodable() {
        assert_eq!(
            decode(&[0x00]).unwrap(),
            ServerResponse::Error {
                description: vec![]
            }
        );
        assert_eq!(
            decode(&[0x00, 0xff, 0x00, 0x13]).unwrap(),
            ServerResponse::Error {
                description: vec![0xff, 0x00, 0x13]
            }
        );
        assert_eq!(
            decode(b"\x00too many hops").unwrap(),
            ServerResponse::error("too many hops")
        );
    }

    #[test]
    fn test_unknown_tag_and_empty_frame() {
        assert_eq!(malformed(decode(&[])), Malformation::EmptyFrame);
        assert_eq!(malformed(decode(&[0x03, 1, 2])), Malformation::UnknownTag(3));
        assert_eq!(malformed(decode(&[0xff])), Malformation::UnknownTag(0xff));
    }

    #[test]
    fn test_response_serialize_deserialize() {
        let pinned = WireParams::default().with_reply_surbs_for_hops(DEFAULT_NUM_MIX_HOPS);
        let mut surb_bytes = vec![0u8; reply_surb_len(DEFAULT_NUM_MIX_HOPS)];
        rand::thread_rng().fill_bytes(&mut surb_bytes);

        let responses = vec![
            ServerResponse::error("no route to gateway"),
            ServerResponse::Received(ReceivedMessage::new(b"foomp".to_vec(), None)),
            ServerResponse::Received(ReceivedMessage::new(
                vec![7; 2048],
                Some(ReplySurb::from_bytes(surb_bytes)),
            )),
            ServerResponse::SelfAddress {
                address: Address::new([1; 32], [2; 32], [3; 32]),
            },
        ];

        for response in responses {
            let serialized = response.serialize();
            assert_eq!(serialized[0], response.tag() as u8);
            assert_eq!(
                ServerResponse::deserialize(&serialized, &pinned).unwrap(),
                response
            );
        }
    }

    #[test]
    fn test_truncated_frames_never_decode() {
        let received = ServerResponse::Received(ReceivedMessage::new(
            b"hello mixnet".to_vec(),
            Some(ReplySurb::from_bytes(vec![9; 64])),
        ))
        .serialize();
        let self_address = ServerResponse::SelfAddress {
            address: Address::from([4u8; ADDRESS_LEN]),
        }
        .serialize();

        for frame in [received, self_address] {
            for cut in 0..frame.len() {
                assert!(decode(&frame[..cut]).is_err(), "prefix of {} bytes decoded", cut);
            }
            let mut padded = frame.clone();
            padded.push(0);
            assert!(decode(&padded).is_err());
        }
    }

    #[test]
    fn test_random_frames_do_not_panic() {
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let len = rng.gen_range(0..64);
            let mut frame = vec![0u8; len];
            rng.fill_bytes(&mut frame);
            if let Some(first) = frame.first_mut() {
                // keep most frames on a known tag so the variant parsers get exercised
                *first %= 4;
            }
            match decode(&frame) {
                Ok(ServerResponse::Received(received)) => {
                    assert_eq!(ServerResponse::Received(received).serialize(), frame)
                }
                Ok(_) | Err(DecodeError::MalformedResponse(_)) => {}
                Err(other) => panic!("unexpected error kind {:?}", other),
            }
        }
    }

    #[test]
    fn test_concurrent_decoding() {
        let frame = ServerResponse::Received(ReceivedMessage::new(vec![1; 512], None)).serialize();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        assert!(decode(&frame).is_ok());
                    }
                });
            }
        });
    }
}
