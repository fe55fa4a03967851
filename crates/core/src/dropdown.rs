//! Picks which `<select>` option best stands in for a fill value.

use crate::similarity::similarity;

/// Default minimum similarity an option must beat to be chosen.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Index of the first option whose text is more similar to `target` than
/// `threshold`. Options are tried in order and the scan stops at the first
/// acceptable one, so a closer match further down is never considered.
pub fn pick_option<S: AsRef<str>>(target: &str, options: &[S], threshold: f64) -> Option<usize> {
    options
        .iter()
        .position(|option| similarity(option.as_ref(), target) > threshold)
}
