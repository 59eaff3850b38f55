use crate::models::events::SessionEvent;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Fans events out to subscribers as they happen and keeps the ones emitted
/// by the running operation so it can return them.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
    batch: Vec<SessionEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiverStream<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        UnboundedReceiverStream::new(rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn emit(&mut self, event: SessionEvent) {
        // Subscribers whose receiver was dropped are pruned here.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        self.batch.push(event);
    }

    /// Events emitted since the last call.
    pub fn take_batch(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.batch)
    }
}
