use std::collections::VecDeque;

use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{event, Level};

use crate::address::Address;
use crate::params::WireParams;
use crate::settings::ClientSettings;
use crate::surb::ReplySurb;

use super::error::DecodeError;
use super::request::ClientRequest;
use super::response::{ReceivedMessage, ServerResponse};

type MixnetSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid mixnet client endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("websocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("mixnet client reported an error: {0}")]
    Remote(String),

    #[error("connection to the mixnet client was closed")]
    ConnectionClosed,
}

///
/// Connection from an application to its local mixnet client.
///
/// The protocol carries no request identifiers, so the client keeps at most
/// one query (`self_address`) outstanding and matches its answer by response
/// type. Messages received from the mix network while waiting are queued and
/// handed out later by `next_message`.
///
pub struct MixnetClient {
    read_stream: SplitStream<MixnetSocket>,
    write_sink: SplitSink<MixnetSocket, Message>,
    wire_params: WireParams,
    pending_messages: VecDeque<ReceivedMessage>,
}

impl MixnetClient {
    pub async fn connect(settings: &ClientSettings) -> Result<Self, ClientError> {
        let url = url::Url::parse(&settings.endpoint.websocket_url())?;
        event!(Level::INFO, "connecting to mixnet client at {}", url);
        let (ws_stream, _) = connect_async(url).await?;

        let (write_sink, read_stream) = ws_stream.split();

        Ok(MixnetClient {
            read_stream,
            write_sink,
            wire_params: settings.wire_params,
            pending_messages: VecDeque::new(),
        })
    }

    pub fn wire_params(&self) -> &WireParams {
        &self.wire_params
    }

    pub async fn send_request(&mut self, request: &ClientRequest) -> Result<(), ClientError> {
        event!(Level::TRACE, "sending {:?} request", request.tag());
        self.write_sink
            .send(Message::Binary(request.serialize()))
            .await?;
        Ok(())
    }

    ///
    /// Waits for the next response frame and decodes it.
    ///
    /// Text, ping and pong frames are not part of the protocol and are skipped.
    ///
    pub async fn next_response(&mut self) -> Result<ServerResponse, ClientError> {
        loop {
            let message = match self.read_stream.next().await {
                Some(message) => message?,
                None => return Err(ClientError::ConnectionClosed),
            };
            match message {
                Message::Binary(frame) => {
                    return Ok(ServerResponse::deserialize(&frame, &self.wire_params)?)
                }
                Message::Close(_) => return Err(ClientError::ConnectionClosed),
                _ => event!(Level::DEBUG, "skipping non-binary websocket frame"),
            }
        }
    }

    ///
    /// Asks the mixnet client for our own address.
    ///
    /// Error frames carry no request identifier, so an error the mixnet client
    /// raised for an earlier `send` or `reply` that is still in flight is
    /// reported here as `ClientError::Remote` too.
    ///
    pub async fn self_address(&mut self) -> Result<Address, ClientError> {
        self.send_request(&ClientRequest::SelfAddress).await?;
        loop {
            match self.next_response().await? {
                ServerResponse::SelfAddress { address } => return Ok(address),
                ServerResponse::Received(received) => self.pending_messages.push_back(received),
                ServerResponse::Error { description } => {
                    return Err(ClientError::Remote(
                        String::from_utf8_lossy(&description).into_owned(),
                    ))
                }
            }
        }
    }

    /// Sends `message` to `recipient`. Nothing acknowledges delivery.
    pub async fn send(
        &mut self,
        recipient: Address,
        message: Vec<u8>,
        with_reply_surb: bool,
    ) -> Result<(), ClientError> {
        self.send_request(&ClientRequest::Send {
            recipient,
            message,
            with_reply_surb,
        })
        .await
    }

    /// Answers a received message through its reply SURB, which is used up.
    pub async fn reply(&mut self, reply_surb: ReplySurb, message: Vec<u8>) -> Result<(), ClientError> {
        self.send_request(&ClientRequest::Reply {
            reply_surb,
            message,
        })
        .await
    }

    /// The next message delivered to us, queued ones first.
    pub async fn next_message(&mut self) -> Result<ReceivedMessage, ClientError> {
        if let Some(received) = self.pending_messages.pop_front() {
            return Ok(received);
        }
        loop {
            match self.next_response().await? {
                ServerResponse::Received(received) => return Ok(received),
                ServerResponse::Error { description } => {
                    return Err(ClientError::Remote(
                        String::from_utf8_lossy(&description).into_owned(),
                    ))
                }
                ServerResponse::SelfAddress { .. } => {
                    event!(Level::WARN, "dropping unsolicited self address response")
                }
            }
        }
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.write_sink.close().await?;
        Ok(())
    }
}
