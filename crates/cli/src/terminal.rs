use engine_core::notify::{NoticeLevel, ProgressDisplay, StatusNotifier};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

const BAR_LENGTH: u64 = 1_000;
const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent:>3}% {msg}";

/// The bar shared by the display, the notifier and the log writer.
/// It draws nothing until a [`TerminalDisplay`] makes it visible.
pub fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(BAR_LENGTH), ProgressDrawTarget::hidden());
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Prints notices to stderr so stdout stays free for the JSON report.
pub struct TerminalNotifier {
    bar: ProgressBar,
}

impl TerminalNotifier {
    pub fn new(bar: ProgressBar) -> Self {
        TerminalNotifier { bar }
    }
}

impl StatusNotifier for TerminalNotifier {
    fn notify(&self, level: NoticeLevel, title: &str, detail: &str) {
        self.bar.suspend(|| eprintln!("[{level}] {title}: {detail}"));
    }
}

/// Log sink for the fmt subscriber. Each line is written with the bar
/// cleared, then the bar is redrawn below it.
#[derive(Clone)]
pub struct BarLogWriter {
    bar: ProgressBar,
}

impl BarLogWriter {
    pub fn new(bar: ProgressBar) -> Self {
        BarLogWriter { bar }
    }
}

impl<'a> MakeWriter<'a> for BarLogWriter {
    type Writer = BarLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for BarLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bar.suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Single progress bar driven by the progress reporter.
pub struct TerminalDisplay {
    bar: ProgressBar,
}

impl TerminalDisplay {
    pub fn new(bar: ProgressBar, hidden: bool) -> Self {
        if !hidden {
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        TerminalDisplay { bar }
    }
}

impl ProgressDisplay for TerminalDisplay {
    fn update(&mut self, message: &str, fraction: f64) {
        self.bar
            .set_position((fraction.clamp(0.0, 1.0) * BAR_LENGTH as f64).round() as u64);
        self.bar.set_message(message.to_string());
    }

    fn complete(&mut self) {
        self.bar.set_position(BAR_LENGTH);
        self.bar.finish_with_message("Done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_writer_reports_whole_buffer_written() {
        let bar = progress_bar();
        let mut writer = BarLogWriter::new(bar).make_writer();

        assert_eq!(writer.write(b" INFO batch started\n").unwrap(), 20);
        assert!(writer.flush().is_ok());
    }

    #[test]
    fn display_drives_the_shared_bar() {
        let bar = progress_bar();
        let mut display = TerminalDisplay::new(bar.clone(), true);

        display.update("Exporting: row 2", 0.25);
        assert_eq!(bar.position(), 250);
        assert_eq!(bar.message(), "Exporting: row 2");

        display.complete();
        assert_eq!(bar.position(), BAR_LENGTH);
        assert!(bar.is_finished());
    }
}
