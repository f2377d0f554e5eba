use tokio::sync::mpsc;
use tracing::warn;

/// Events emitted by the scroll engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEvent {
    /// Current page index changed
    IndexChanged(Option<usize>),
    /// Page whose top is aligned with the offset changed
    ExactIndexChanged(Option<usize>),
    Initialized,
    Destroyed,
    /// A navigation move has settled
    MoveFinished,
}

/// Ordered broadcast to any number of subscribers.
///
/// Nothing is buffered for late subscribers: they only see events emitted
/// after they subscribed.
#[derive(Debug, Default)]
pub struct EventBroadcaster {
    subscribers: Vec<mpsc::UnboundedSender<ScrollEvent>>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ScrollEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: ScrollEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            warn!("Dropped {} closed scroll event subscriber(s)", dropped);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_in_order() {
        let mut events = EventBroadcaster::new();
        let mut a = events.subscribe();
        let mut b = events.subscribe();

        events.emit(ScrollEvent::Initialized);
        events.emit(ScrollEvent::IndexChanged(Some(0)));

        for rx in [&mut a, &mut b] {
            assert_eq!(rx.try_recv().unwrap(), ScrollEvent::Initialized);
            assert_eq!(rx.try_recv().unwrap(), ScrollEvent::IndexChanged(Some(0)));
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_late_subscriber_misses_past_events() {
        let mut events = EventBroadcaster::new();
        events.emit(ScrollEvent::Initialized);
        let mut late = events.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn test_closed_subscriber_pruned() {
        let mut events = EventBroadcaster::new();
        let kept = events.subscribe();
        drop(events.subscribe());

        events.emit(ScrollEvent::MoveFinished);
        assert_eq!(events.subscriber_count(), 1);
        drop(kept);
    }
}
