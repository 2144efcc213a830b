//! Dialect renderers: pure functions from a [`crate::Differential`] to the
//! exact GNU `diff` normal/context/unified text forms (§6).

mod context;
mod normal;
mod unified;

use crate::model::{Dialect, Differential};

/// Render a diff in the requested dialect. `old_label`/`new_label` are used
/// as the `***`/`---` (context) or `---`/`+++` (unified) file headers;
/// ignored by the normal dialect, which has none.
pub fn render(diff: &Differential, dialect: Dialect, old_label: &str, new_label: &str) -> String {
    match dialect {
        Dialect::Normal => normal::render(diff),
        Dialect::Context { .. } => context::render(diff, old_label, new_label),
        Dialect::Unified { .. } => unified::render(diff, old_label, new_label),
    }
}

/// The 1-based number GNU `diff` prints for a range whose count may be zero:
/// an empty range prints one less than its nominal start (the line after
/// which an insertion/deletion occurs), everywhere this convention is used
/// (normal's bare position, unified's and context's `l,0` ranges).
fn display_start(start_1based: usize, count: usize) -> usize {
    if count == 0 {
        start_1based.saturating_sub(1)
    } else {
        start_1based
    }
}
