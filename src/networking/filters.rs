use std::convert::Infallible;
use std::sync::Arc;

use tokio::sync::RwLock;
use warp::{Filter, Reply};

use super::handlers::ws_upgrade_handler;
use super::loopback::LoopbackMixnet;

/// websocket upgrade filter, the API is served at the root path.
pub fn ws_upgrade_route_filter(
    loopback_lock: Arc<RwLock<LoopbackMixnet>>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path::end()
        .and(warp::ws())
        .and(with_loopback(loopback_lock))
        .and_then(ws_upgrade_handler)
}

/// inject loopback lock
fn with_loopback(
    loopback_lock: Arc<RwLock<LoopbackMixnet>>,
) -> impl Filter<Extract = (Arc<RwLock<LoopbackMixnet>>,), Error = Infallible> + Clone {
    warp::any().map(move || loopback_lock.clone())
}
