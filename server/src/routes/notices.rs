// SSE stream of transient notices

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use crate::AppState;

pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    info!(target: "notices", "New SSE client connected");

    let rx = state.dashboard.notifier.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(notice) => match serde_json::to_string(&notice) {
            Ok(json) => Some(Ok(Event::default().data(json))),
            Err(e) => {
                warn!(target: "notices", error = %e, "Failed to serialize notice");
                None
            }
        },
        Err(e) => {
            warn!(target: "notices", error = %e, "Broadcast error");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
