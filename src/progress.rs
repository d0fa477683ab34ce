use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_CHARS: &str = "█▓░";

/// Progress bar counting optimizer epochs against the epoch budget. When
/// `visible` is false the bar is hidden, so library callers and tests stay
/// quiet.
pub fn epoch_progress_bar(label: impl Into<String>, max_epochs: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(max_epochs as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{prefix:.bold.dim} {spinner:.green} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} epochs ({eta} @ {per_sec}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(BAR_CHARS),
    );
    pb.set_prefix(label.into());
    pb.enable_steady_tick(Duration::from_millis(75));
    pb
}

/// Report the live contact count next to the bar.
pub fn report_contacts(pb: &ProgressBar, contacts: usize) {
    pb.set_message(format!("{} contacts", contacts));
}
