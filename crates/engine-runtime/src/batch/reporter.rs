use engine_core::{
    notify::ProgressDisplay,
    progress::{ProgressReceiver, TryProgress},
};
use model::events::progress::ProgressEvent;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Display-side consumer of the progress channel.
///
/// Every poll drains whatever is buffered, shows the latest message, and
/// completes the display once `Done` arrives. Polls after that are no-ops.
pub struct ProgressReporter<D: ProgressDisplay> {
    display: D,
    rx: ProgressReceiver,
    poll_interval: Duration,
    done: bool,
}

impl<D: ProgressDisplay> ProgressReporter<D> {
    pub fn new(display: D, rx: ProgressReceiver) -> Self {
        ProgressReporter {
            display,
            rx,
            poll_interval: DEFAULT_POLL_INTERVAL,
            done: false,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Consumes every buffered event. Returns `true` once the batch is done.
    pub fn poll(&mut self) -> bool {
        while !self.done {
            match self.rx.try_next() {
                TryProgress::Event(ProgressEvent::Done) => self.complete(),
                TryProgress::Event(event) => self.show(&event),
                TryProgress::Empty => break,
                TryProgress::Closed => {
                    warn!("Progress channel closed without Done");
                    self.complete();
                }
            }
        }
        self.done
    }

    /// Polls on a fixed interval until `Done`, then hands the display back.
    pub async fn run(mut self) -> D {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.poll() {
            ticker.tick().await;
        }
        self.display
    }

    fn show(&mut self, event: &ProgressEvent) {
        if let ProgressEvent::Item { message, .. } = event {
            self.display.update(message, event.fraction());
        }
    }

    fn complete(&mut self) {
        debug!("Batch progress complete");
        self.done = true;
        self.display.complete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::progress::progress_channel;

    #[derive(Default)]
    struct RecordingDisplay {
        updates: Vec<(String, f64)>,
        completions: usize,
    }

    impl ProgressDisplay for RecordingDisplay {
        fn update(&mut self, message: &str, fraction: f64) {
            self.updates.push((message.to_string(), fraction));
        }

        fn complete(&mut self) {
            self.completions += 1;
        }
    }

    #[test]
    fn poll_drains_everything_buffered() {
        let (mut tx, rx) = progress_channel();
        let mut reporter = ProgressReporter::new(RecordingDisplay::default(), rx);

        assert!(!reporter.poll());
        tx.item(1, 4, "Converting: a.mov");
        tx.item(2, 4, "Skipped: b.txt");
        assert!(!reporter.poll());

        assert_eq!(
            reporter.display.updates,
            vec![
                ("Converting: a.mov".to_string(), 0.25),
                ("Skipped: b.txt".to_string(), 0.5),
            ]
        );
        assert_eq!(reporter.display.completions, 0);
    }

    #[test]
    fn done_completes_exactly_once() {
        let (mut tx, rx) = progress_channel();
        let mut reporter = ProgressReporter::new(RecordingDisplay::default(), rx);

        tx.item(1, 1, "Cleaning: a.pdf");
        tx.finish();

        assert!(reporter.poll());
        assert!(reporter.poll());
        assert!(reporter.poll());
        assert_eq!(reporter.display.completions, 1);
        assert_eq!(reporter.display.updates.len(), 1);
    }

    #[tokio::test]
    async fn run_waits_between_polls_until_done() {
        let (mut tx, rx) = progress_channel();
        let reporter = ProgressReporter::new(RecordingDisplay::default(), rx)
            .with_poll_interval(Duration::from_millis(10));

        let worker = tokio::spawn(async move {
            for i in 1..=3 {
                tokio::time::sleep(Duration::from_millis(25)).await;
                tx.item(i, 3, format!("item {i}"));
            }
            tx.finish();
        });

        let display = reporter.run().await;
        worker.await.unwrap();

        assert_eq!(display.completions, 1);
        let messages: Vec<&str> = display.updates.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(messages, vec!["item 1", "item 2", "item 3"]);
    }
}
