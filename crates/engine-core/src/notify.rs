use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        })
    }
}

/// One-shot, fire-and-forget messages to the user.
pub trait StatusNotifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, title: &str, detail: &str);

    fn info(&self, title: &str, detail: &str) {
        self.notify(NoticeLevel::Info, title, detail);
    }

    fn warning(&self, title: &str, detail: &str) {
        self.notify(NoticeLevel::Warning, title, detail);
    }

    fn error(&self, title: &str, detail: &str) {
        self.notify(NoticeLevel::Error, title, detail);
    }
}

/// Where the progress reporter renders the running status.
pub trait ProgressDisplay: Send {
    /// `fraction` is in `[0.0, 1.0]`.
    fn update(&mut self, message: &str, fraction: f64);

    /// Called exactly once, after the last event of the batch.
    fn complete(&mut self);
}
