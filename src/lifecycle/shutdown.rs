//! Graceful shutdown.
//!
//! One [`Shutdown`] lives in `main`. The HTTP server holds a receiver and
//! stops accepting connections once it fires; in-flight requests, including
//! any secret computation on the blocking pool, run to completion.

use tokio::sync::broadcast;

/// Fan-out stop signal for the listener and anything else that subscribes.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver that resolves when [`Shutdown::trigger`] is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. No subscribers is not an error.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no listeners");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
