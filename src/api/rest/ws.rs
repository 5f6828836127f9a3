use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{info, warn};

use crate::api::rest::orders::OrderListing;
use crate::engine::filter::OrderFilter;
use crate::engine::format::DisplayFormat;
use crate::state::AppState;
use crate::store::memory::OrderSnapshot;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// The active order list, recomputed for the current snapshot and again after
/// every replacement.
pub fn listing_feed(
    snapshots: watch::Receiver<Arc<OrderSnapshot>>,
    display: DisplayFormat,
) -> impl Stream<Item = OrderListing> {
    let filter = OrderFilter::default();

    WatchStream::new(snapshots).map(move |snapshot| {
        OrderListing::build(
            snapshot.revision,
            &snapshot.orders,
            &filter,
            false,
            &display,
        )
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut listings = Box::pin(listing_feed(state.store.subscribe(), state.display));

    info!("websocket client connected");

    let send_task = tokio::spawn(async move {
        while let Some(listing) = listings.next().await {
            let json = match serde_json::to_string(&listing) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize order listing for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("websocket client disconnected");
}
