//! Stop signal shared by the listener, the signal handler and tests.
//!
//! Firing it closes the accept loop; requests already being proxied run to
//! completion (or to their deadline) before `HttpServer::run` returns.

use tokio::sync::broadcast;

/// Cloneable handle that tells every running proxy server to stop accepting.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        // One slot: the signal is fired at most once.
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop accepting connections and start draining.
    /// A no-op when no server is listening.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Receivers still alive, i.e. servers that have not yet seen the signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Graceful-shutdown future for `axum::serve`: ends on trigger, or once every
/// `Shutdown` handle is dropped.
pub async fn wait(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}
