//! Server-Sent Events support for the realtime mirror

use crate::db::Message;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream.
///
/// The stream opens with an `init` event carrying the replayed history,
/// then mirrors every append. Replay and live pushes can overlap;
/// clients dedupe by message id.
pub fn sse_stream(
    history: Vec<Message>,
    broadcast_rx: tokio::sync::broadcast::Receiver<Message>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        Ok(Event::default()
            .event("init")
            .data(json!({ "type": "init", "messages": history }).to_string()))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(message) => Some(Ok(Event::default()
            .event("message")
            .data(json!({ "type": "message", "message": message }).to_string()))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
