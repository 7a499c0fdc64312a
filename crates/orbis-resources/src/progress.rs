//! Conversion progress reporting.
//!
//! Conversions of large redirect maps take minutes, so the converter reports
//! progress to a [`ConversionProgress`]. Reporting never changes the output.

use std::cell::{Cell, RefCell};

use indicatif::{ProgressBar, ProgressStyle};

pub trait ConversionProgress {
    /// A conversion of `total` entries begins.
    fn start(&self, label: &str, total: u64);
    /// `delta` more entries were processed.
    fn advance(&self, delta: u64);
    fn finish(&self);
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ConversionProgress for NoProgress {
    fn start(&self, _label: &str, _total: u64) {}
    fn advance(&self, _delta: u64) {}
    fn finish(&self) {}
}

/// Logs progress through `tracing` in 10% steps.
#[derive(Debug, Default)]
pub struct LogProgress {
    label: RefCell<String>,
    total: Cell<u64>,
    position: Cell<u64>,
    next_step: Cell<u64>,
}

impl ConversionProgress for LogProgress {
    fn start(&self, label: &str, total: u64) {
        *self.label.borrow_mut() = label.to_string();
        self.total.set(total);
        self.position.set(0);
        self.next_step.set(10);
        tracing::debug!(total, "{label}: started");
    }

    fn advance(&self, delta: u64) {
        let position = self.position.get() + delta;
        self.position.set(position);

        let total = self.total.get().max(1);
        let percent = position.saturating_mul(100) / total;
        if percent >= self.next_step.get() {
            tracing::debug!(position, total, "{}: {percent}%", self.label.borrow());
            self.next_step.set((percent / 10 + 1) * 10);
        }
    }

    fn finish(&self) {
        tracing::debug!(entries = self.position.get(), "{}: complete", self.label.borrow());
    }
}

/// Terminal progress bar.
#[derive(Debug, Default)]
pub struct BarProgress {
    bar: RefCell<Option<ProgressBar>>,
}

impl ConversionProgress for BarProgress {
    fn start(&self, label: &str, total: u64) {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::with_template("{msg} |{bar:50}| {percent}% {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(label.to_string());
        *self.bar.borrow_mut() = Some(bar);
    }

    fn advance(&self, delta: u64) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.inc(delta);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_with_message("Complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_tracks_position() {
        let progress = LogProgress::default();
        progress.start("Converting lense", 200);
        for _ in 0..200 {
            progress.advance(1);
        }
        progress.finish();
        assert_eq!(progress.position.get(), 200);
        assert_eq!(progress.next_step.get(), 110);
    }

    #[test]
    fn test_log_progress_zero_total() {
        let progress = LogProgress::default();
        progress.start("empty", 0);
        progress.advance(1);
        assert_eq!(progress.position.get(), 1);
    }

    #[test]
    fn test_bar_progress_lifecycle() {
        let progress = BarProgress::default();
        progress.advance(1);
        progress.start("Converting filter", 3);
        progress.advance(3);
        progress.finish();
        assert!(progress.bar.borrow().is_none());
    }
}
