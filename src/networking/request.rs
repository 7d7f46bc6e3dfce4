use std::convert::TryFrom;

use crate::address::Address;
use crate::params::WireParams;
use crate::surb::ReplySurb;

use super::error::{DecodeError, Malformation};
use super::frame::{put_prefixed, FrameReader};
use super::tags::RequestTag;

///
/// A request from the application to the mixnet client.
///
/// - `Send` - deliver `message` to `recipient`, optionally attaching a reply SURB
/// - `Reply` - deliver `message` back along a previously received `reply_surb`
/// - `SelfAddress` - ask the mixnet client for our own address
///
#[derive(Debug, PartialEq, Eq)]
pub enum ClientRequest {
    Send {
        recipient: Address,
        message: Vec<u8>,
        with_reply_surb: bool,
    },
    Reply {
        reply_surb: ReplySurb,
        message: Vec<u8>,
    },
    SelfAddress,
}

impl ClientRequest {
    pub fn tag(&self) -> RequestTag {
        match self {
            ClientRequest::Send { .. } => RequestTag::Send,
            ClientRequest::Reply { .. } => RequestTag::Reply,
            ClientRequest::SelfAddress => RequestTag::SelfAddress,
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut vbytes: Vec<u8> = vec![self.tag() as u8];
        match self {
            // SEND || with_reply_surb || recipient || message_len || message
            ClientRequest::Send {
                recipient,
                message,
                with_reply_surb,
            } => {
                vbytes.push(*with_reply_surb as u8);
                // the address has a pinned length so it is not prefixed
                vbytes.extend(recipient.as_bytes());
                put_prefixed(&mut vbytes, message);
            }
            // REPLY || surb_len || surb || message_len || message
            ClientRequest::Reply {
                reply_surb,
                message,
            } => {
                put_prefixed(&mut vbytes, reply_surb.as_bytes());
                put_prefixed(&mut vbytes, message);
            }
            // SELF_ADDRESS
            ClientRequest::SelfAddress => {}
        }
        vbytes
    }

    /// Parses a request frame, as the mixnet client does on its end of the socket.
    pub fn deserialize(bytes: &[u8], params: &WireParams) -> Result<ClientRequest, DecodeError> {
        let mut reader = FrameReader::new(bytes);
        let tag = reader
            .read_u8("request tag")
            .map_err(|_| DecodeError::MalformedRequest(Malformation::EmptyFrame))?;
        let tag = RequestTag::try_from(tag).map_err(DecodeError::UnrecognizedRequestTag)?;

        let request = match tag {
            RequestTag::Send => Self::deserialize_send(reader, params),
            RequestTag::Reply => Self::deserialize_reply(reader, params),
            RequestTag::SelfAddress => reader
                .expect_end()
                .map(|_| ClientRequest::SelfAddress),
        };
        request.map_err(DecodeError::MalformedRequest)
    }

    fn deserialize_send(
        mut reader: FrameReader<'_>,
        params: &WireParams,
    ) -> Result<ClientRequest, Malformation> {
        let with_reply_surb = reader.read_flag("reply SURB flag")?;
        let recipient_bytes = reader.take("recipient", params.address_len() as u64)?;
        let recipient = Address::try_from_bytes(recipient_bytes, params)?;
        let message = reader.read_trailing_prefixed("message")?;

        Ok(ClientRequest::Send {
            recipient,
            message: message.to_vec(),
            with_reply_surb,
        })
    }

    fn deserialize_reply(
        mut reader: FrameReader<'_>,
        params: &WireParams,
    ) -> Result<ClientRequest, Malformation> {
        let reply_surb_len = reader.read_u64("reply SURB length")?;
        params.check_reply_surb_len(reply_surb_len)?;
        let reply_surb = reader.take("reply SURB", reply_surb_len)?;
        let message = reader.read_trailing_prefixed("message")?;

        Ok(ClientRequest::Reply {
            reply_surb: ReplySurb::from_bytes(reply_surb.to_vec()),
            message: message.to_vec(),
        })
    }
}
