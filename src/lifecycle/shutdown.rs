//! Shutdown coordination for the gate.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Broadcasts a single stop notice to the server and any other task that
/// subscribed. Clones share the same channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber. Triggering with no subscribers left is a no-op.
    pub fn trigger(&self) {
        let listeners = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners, "Shutdown triggered");
    }

    /// Trigger once `event` resolves, e.g. on an OS signal.
    pub fn trigger_on<F>(&self, event: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.clone();
        tokio::spawn(async move {
            event.await;
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut reloader = shutdown.clone().subscribe();

        shutdown.trigger();
        assert!(server.recv().await.is_ok());
        assert!(reloader.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_on_waits_for_event() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let (fire, signal) = oneshot::channel::<()>();

        let task = shutdown.trigger_on(async move {
            let _ = signal.await;
        });
        assert!(rx.try_recv().is_err());

        fire.send(()).unwrap();
        task.await.unwrap();
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_subscribers_is_harmless() {
        Shutdown::default().trigger();
    }
}
