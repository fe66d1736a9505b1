use model::events::progress::ProgressEvent;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, warn};

/// Creates the single-producer, single-consumer channel between the batch
/// worker and the progress reporter.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ProgressSender {
            tx: Some(tx),
            last_index: 0,
        },
        ProgressReceiver { rx },
    )
}

/// Producer half of the progress channel.
///
/// `Done` is sent exactly once: by [`ProgressSender::finish`], or on drop if
/// the sender goes away without finishing (e.g. the worker unwinds).
#[derive(Debug)]
pub struct ProgressSender {
    tx: Option<mpsc::UnboundedSender<ProgressEvent>>,
    last_index: usize,
}

impl ProgressSender {
    /// Sends an `Item` event. Indices must be strictly increasing; an event
    /// that would go backwards is dropped.
    pub fn item(&mut self, index: usize, total: usize, message: impl Into<String>) {
        if index <= self.last_index {
            warn!(index, last = self.last_index, "Dropping out-of-order progress event");
            return;
        }
        self.last_index = index;
        self.send(ProgressEvent::item(index, total, message));
    }

    /// Sends the terminal `Done` event and closes the channel.
    pub fn finish(mut self) {
        self.send_done();
    }

    fn send_done(&mut self) {
        if let Some(tx) = self.tx.take()
            && tx.send(ProgressEvent::Done).is_err()
        {
            debug!("Progress receiver already closed before Done");
        }
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx
            && tx.send(event).is_err()
        {
            // The display went away; the batch keeps running without it.
            debug!("Progress receiver closed, event discarded");
        }
    }
}

impl Drop for ProgressSender {
    fn drop(&mut self) {
        self.send_done();
    }
}

/// Result of a non-blocking read from the progress channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryProgress {
    Event(ProgressEvent),
    Empty,
    /// The sender is gone and every event has been read.
    Closed,
}

/// Consumer half of the progress channel.
#[derive(Debug)]
pub struct ProgressReceiver {
    rx: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl ProgressReceiver {
    pub fn try_next(&mut self) -> TryProgress {
        match self.rx.try_recv() {
            Ok(event) => TryProgress::Event(event),
            Err(TryRecvError::Empty) => TryProgress::Empty,
            Err(TryRecvError::Disconnected) => TryProgress::Closed,
        }
    }

    /// Drains everything currently buffered without waiting.
    pub fn drain(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let TryProgress::Event(event) = self.try_next() {
            events.push(event);
        }
        events
    }
}
