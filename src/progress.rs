//! Progress bar styling.

use indicatif::ProgressStyle;

/// Shared progress bar style for batch loops.
pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}: {wide_bar:.cyan/blue} {pos}/{len} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
