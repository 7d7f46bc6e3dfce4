use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{event, Level};
use warp::{Rejection, Reply};

use super::loopback::LoopbackMixnet;
use super::socket;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(0);

pub async fn ws_upgrade_handler(
    ws: warp::ws::Ws,
    loopback_lock: Arc<RwLock<LoopbackMixnet>>,
) -> std::result::Result<impl Reply, Rejection> {
    let connection_id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    event!(Level::DEBUG, "upgrading connection {}", connection_id);
    Ok(ws.on_upgrade(move |socket| {
        socket::client_connection(socket, connection_id, loopback_lock)
    }))
}
