//! Progress reporting: a per-file line counter spinner.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Count-only spinner (total line count is unknown while streaming).
pub fn make_line_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos} lines  it/s: {per_sec}  elapsed: {elapsed_precise}",
    ) {
        pb.set_style(style);
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Optional spinner; all calls are no-ops when disabled.
pub struct ProgressScope {
    pb: Option<ProgressBar>,
}

impl ProgressScope {
    pub fn lines(enabled: bool, label: impl Into<String>) -> Self {
        let pb = if enabled { Some(make_line_spinner(&label.into())) } else { None };
        Self { pb }
    }

    #[inline]
    pub fn inc_lines(&self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    pub fn finish<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb {
            pb.finish_with_message(msg.into());
        }
    }
}
