//! Background loops that keep the node's replica and presence current.
//!
//! Every loop runs one step, then waits for its interval or the shutdown
//! signal, whichever comes first. A step in flight always completes; the
//! signal is only observed between steps.

pub mod heartbeat;
pub mod sync;

pub use heartbeat::{HeartbeatEngine, HeartbeatIntervals};
pub use sync::SyncEngine;

use std::time::Duration;
use tokio::sync::broadcast;

/// Sleeps for `delay` unless shutdown is signalled first. Returns `true`
/// when the caller should stop. A closed or lagged channel counts as a stop.
pub(crate) async fn wait_or_shutdown(
    shutdown_rx: &mut broadcast::Receiver<()>,
    delay: Duration,
) -> bool {
    tokio::select! {
        biased;

        _ = shutdown_rx.recv() => true,
        _ = tokio::time::sleep(delay) => false,
    }
}
