use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use rand::RngCore;
use tokio::sync::RwLock;
use tracing::{event, Level};

use crate::address::Address;
use crate::params::{reply_surb_len, WireParams, DEFAULT_NUM_MIX_HOPS};
use crate::settings::LoopbackSettings;
use crate::surb::ReplySurb;

use super::filters::ws_upgrade_route_filter;
use super::request::ClientRequest;
use super::response::{ReceivedMessage, ServerResponse};

/// Unredeemed reply SURBs remembered by default; older ones are forgotten first.
pub const MAX_OUTSTANDING_REPLY_SURBS: usize = 1024;

///
/// A stand-in for the mixnet client.
///
/// It speaks the server side of the protocol but never touches a mix network:
/// messages sent to its own address come straight back, and the reply SURBs it
/// hands out are random bytes it remembers until they are used, or until
/// `reply_surb_capacity` newer ones push them out.
///
#[derive(Debug)]
pub struct LoopbackMixnet {
    address: Address,
    wire_params: WireParams,
    issued_reply_surbs: VecDeque<Vec<u8>>,
    reply_surb_capacity: usize,
}

impl LoopbackMixnet {
    /// A loopback peer with a random address of the configured length.
    pub fn new(wire_params: WireParams) -> Self {
        let mut address_bytes = vec![0u8; wire_params.address_len()];
        rand::thread_rng().fill_bytes(&mut address_bytes);
        Self::with_address(Address::from_raw(address_bytes), wire_params)
    }

    pub fn with_address(address: Address, wire_params: WireParams) -> Self {
        LoopbackMixnet {
            address,
            wire_params,
            issued_reply_surbs: VecDeque::new(),
            reply_surb_capacity: MAX_OUTSTANDING_REPLY_SURBS,
        }
    }

    /// Same peer, remembering at most `capacity` unredeemed reply SURBs.
    pub fn with_reply_surb_capacity(self, capacity: usize) -> Self {
        LoopbackMixnet {
            reply_surb_capacity: capacity.max(1),
            ..self
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn wire_params(&self) -> &WireParams {
        &self.wire_params
    }

    /// Number of reply SURBs handed out and not yet used.
    pub fn outstanding_reply_surbs(&self) -> usize {
        self.issued_reply_surbs.len()
    }

    ///
    /// Answers one request frame.
    ///
    /// Frames which fail to decode are answered with an `Error` response
    /// carrying the decode diagnostic.
    ///
    pub fn handle_frame(&mut self, frame: &[u8]) -> ServerResponse {
        match ClientRequest::deserialize(frame, &self.wire_params) {
            Ok(request) => self.handle_request(request),
            Err(err) => {
                event!(Level::WARN, "rejecting request frame: {}", err);
                ServerResponse::error(err.to_string())
            }
        }
    }

    pub fn handle_request(&mut self, request: ClientRequest) -> ServerResponse {
        match request {
            ClientRequest::SelfAddress => ServerResponse::SelfAddress {
                address: self.address.clone(),
            },
            ClientRequest::Send {
                recipient,
                message,
                with_reply_surb,
            } => {
                if recipient != self.address {
                    event!(Level::INFO, "cannot route to {}, only to ourselves", recipient);
                    return ServerResponse::error(format!(
                        "loopback mixnet can only deliver to its own address {}",
                        self.address
                    ));
                }
                let reply_surb = if with_reply_surb {
                    Some(self.mint_reply_surb())
                } else {
                    None
                };
                event!(
                    Level::DEBUG,
                    "looping back {} byte message (reply SURB attached: {})",
                    message.len(),
                    with_reply_surb
                );
                ServerResponse::Received(ReceivedMessage::new(message, reply_surb))
            }
            ClientRequest::Reply {
                reply_surb,
                message,
            } => {
                let issued = self
                    .issued_reply_surbs
                    .iter()
                    .position(|issued| issued.as_slice() == reply_surb.as_bytes());
                if issued
                    .and_then(|index| self.issued_reply_surbs.remove(index))
                    .is_none()
                {
                    event!(Level::WARN, "rejecting reply over unknown or used {:?}", reply_surb);
                    return ServerResponse::error("reply SURB is unknown or was already used");
                }
                event!(Level::DEBUG, "looping back {} byte reply", message.len());
                ServerResponse::Received(ReceivedMessage::new(message, None))
            }
        }
    }

    fn mint_reply_surb(&mut self) -> ReplySurb {
        let surb_len = self
            .wire_params
            .reply_surb_len()
            .unwrap_or_else(|| reply_surb_len(DEFAULT_NUM_MIX_HOPS));
        let mut bytes = vec![0u8; surb_len];
        rand::thread_rng().fill_bytes(&mut bytes);
        while self.issued_reply_surbs.len() >= self.reply_surb_capacity {
            self.issued_reply_surbs.pop_front();
            event!(Level::DEBUG, "forgetting the oldest unredeemed reply SURB");
        }
        self.issued_reply_surbs.push_back(bytes.clone());
        ReplySurb::from_bytes(bytes)
    }
}

///
/// Binds the loopback websocket server to `addr`.
///
/// Returns the bound address (useful when `addr` has port 0) and the server
/// future, which runs until `shutdown` resolves.
///
pub fn bind_loopback(
    loopback_lock: Arc<RwLock<LoopbackMixnet>>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, impl Future<Output = ()>), warp::Error> {
    warp::serve(ws_upgrade_route_filter(loopback_lock))
        .try_bind_with_graceful_shutdown(addr, shutdown)
}

pub async fn run_loopback(
    settings: LoopbackSettings,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> crate::Result<()> {
    let loopback = LoopbackMixnet::new(settings.wire_params);
    event!(Level::INFO, "loopback mixnet address is {}", loopback.address());
    let loopback_lock = Arc::new(RwLock::new(loopback));

    let addr = SocketAddr::from((settings.endpoint.host, settings.endpoint.port));
    let (bound_addr, server) = bind_loopback(loopback_lock, addr, shutdown)?;
    event!(Level::INFO, "loopback mixnet listening on ws://{}", bound_addr);
    server.await;
    event!(Level::INFO, "loopback mixnet stopped");
    Ok(())
}
