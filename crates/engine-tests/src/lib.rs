#![allow(dead_code)]

use engine_core::notify::{NoticeLevel, ProgressDisplay, StatusNotifier};
use std::sync::{Arc, Mutex};

pub mod utils;

/// Poll interval used by every scenario; short enough to keep tests fast.
pub const TEST_POLL_MS: u64 = 5;

/// Everything the progress display was asked to show.
#[derive(Debug, Default)]
pub struct DisplayLog {
    pub messages: Vec<String>,
    pub fractions: Vec<f64>,
    pub completions: usize,
}

#[derive(Clone, Default)]
pub struct CapturingDisplay(pub Arc<Mutex<DisplayLog>>);

impl CapturingDisplay {
    pub fn log(&self) -> std::sync::MutexGuard<'_, DisplayLog> {
        self.0.lock().unwrap()
    }
}

impl ProgressDisplay for CapturingDisplay {
    fn update(&mut self, message: &str, fraction: f64) {
        let mut log = self.log();
        log.messages.push(message.to_string());
        log.fractions.push(fraction);
    }

    fn complete(&mut self) {
        self.log().completions += 1;
    }
}

#[derive(Default)]
pub struct CapturingNotifier {
    pub notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl CapturingNotifier {
    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices.lock().unwrap().iter().map(|(l, _)| *l).collect()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notices.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

impl StatusNotifier for CapturingNotifier {
    fn notify(&self, level: NoticeLevel, title: &str, _detail: &str) {
        self.notices.lock().unwrap().push((level, title.to_string()));
    }
}
