//! Host lifecycle signals.
//!
//! The proxy never drives the host's lifecycle itself; it emits signals and
//! the embedding host (or a test) reacts to them. Delivery is broadcast, so
//! any number of observers can watch the same proxy.

use std::sync::Arc;

use tokio::sync::broadcast;

/// Signal from the proxy to its host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// Skip the waiting phase so this version activates immediately,
    /// without waiting for old clients to close
    SkipWaiting,

    /// Take control of already-open pages now rather than on their
    /// next navigation
    ClaimClients,

    /// Activation finished: stale cache generations have been collected
    Activated,
}

/// Host signal emitter
#[derive(Debug, Clone)]
pub struct SignalEmitter {
    sender: Arc<broadcast::Sender<HostSignal>>,
}

impl SignalEmitter {
    /// Create a new emitter with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Emit a signal. Dropped silently when no host is subscribed.
    pub fn emit(&self, signal: HostSignal) {
        let _ = self.sender.send(signal);
    }

    /// Subscribe to signals emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<HostSignal> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let emitter = SignalEmitter::new(4);
        let mut rx = emitter.subscribe();

        emitter.emit(HostSignal::SkipWaiting);
        emitter.emit(HostSignal::Activated);

        assert_eq!(rx.recv().await.unwrap(), HostSignal::SkipWaiting);
        assert_eq!(rx.recv().await.unwrap(), HostSignal::Activated);
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let emitter = SignalEmitter::new(4);
        emitter.emit(HostSignal::ClaimClients);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_see_the_same_signal() {
        let emitter = SignalEmitter::new(4);
        let mut a = emitter.subscribe();
        let mut b = emitter.subscribe();

        emitter.emit(HostSignal::SkipWaiting);

        assert_eq!(a.recv().await.unwrap(), HostSignal::SkipWaiting);
        assert_eq!(b.recv().await.unwrap(), HostSignal::SkipWaiting);
    }
}
