use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use tokio::sync::{mpsc, RwLock};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{event, Level};
use warp::ws::{Message, WebSocket};

use super::loopback::LoopbackMixnet;

///
/// Serves one application connection until it closes.
///
/// Responses go through an unbounded channel drained by a separate task, so a
/// slow writer never holds up reading the next request. Each binary frame is
/// one request and gets exactly one response frame, in order.
///
pub async fn client_connection(
    ws: WebSocket,
    connection_id: u64,
    loopback_lock: Arc<RwLock<LoopbackMixnet>>,
) {
    let (client_ws_sender, mut client_ws_rcv) = ws.split();
    let (client_sender, client_rcv) = mpsc::unbounded_channel::<Result<Message, warp::Error>>();
    let client_rcv = UnboundedReceiverStream::new(client_rcv);
    tokio::task::spawn(client_rcv.forward(client_ws_sender).map(|result| {
        if let Err(err) = result {
            event!(Level::ERROR, "error sending websocket msg: {}", err);
        }
    }));

    event!(Level::INFO, "connection {} opened", connection_id);

    while let Some(result) = client_ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(err) => {
                event!(
                    Level::ERROR,
                    "error receiving ws message on connection {}: {}",
                    connection_id,
                    err
                );
                break;
            }
        };
        if msg.is_close() {
            break;
        }
        if !msg.is_binary() {
            event!(
                Level::DEBUG,
                "ignoring non-binary frame on connection {}",
                connection_id
            );
            continue;
        }

        let response = loopback_lock.write().await.handle_frame(msg.as_bytes());
        if client_sender
            .send(Ok(Message::binary(response.serialize())))
            .is_err()
        {
            break;
        }
    }

    event!(Level::INFO, "connection {} closed", connection_id);
}
