//! Progress reporting: a count-style bar whose length grows as files are discovered.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Count-style progress bar (jobs drained out of jobs dispatched so far).
/// Draws to stderr so it never interleaves with the report on stdout.
pub fn make_job_progress(label: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    let style = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         files/s: {per_sec}  elapsed: {elapsed_precise}"
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Optional bar shared by the dispatcher (grows the length) and the reducer
/// (advances the position). A disabled scope does nothing.
#[derive(Clone, Default)]
pub struct JobProgress {
    pb: Option<ProgressBar>,
}

impl JobProgress {
    pub fn new(enabled: bool, label: &str) -> Self {
        Self { pb: enabled.then(|| make_job_progress(label)) }
    }
    pub fn disabled() -> Self {
        Self { pb: None }
    }
    #[inline] pub fn job_dispatched(&self) { if let Some(pb) = &self.pb { pb.inc_length(1); } }
    #[inline] pub fn job_drained(&self) { if let Some(pb) = &self.pb { pb.inc(1); } }
    pub fn finish<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb { pb.finish_with_message(msg.into()); }
    }
}
