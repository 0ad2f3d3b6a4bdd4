//! Terminal status output.
//!
//! The run log is tracing's job; this module prints the short, human-facing
//! lines around it: the per-command status glyphs and the closing summary.
//!
//! ```no_run
//! use hay_check::ui;
//!
//! ui::init_colors(ui::should_use_color());
//! ui::success("Fixture table is valid");
//! ui::error("2 of 9 checks failed");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, print_run_summary};
pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Check if color output should be enabled.
///
/// Respects `NO_COLOR` and `FORCE_COLOR`, then falls back to whether stderr
/// is attended.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Turn colored status output on or off for the rest of the process.
pub fn init_colors(enabled: bool) {
    COLORS.store(enabled, Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_colors_toggles_state() {
        init_colors(false);
        assert!(!colors_enabled());
        init_colors(true);
        assert!(colors_enabled());
    }
}
