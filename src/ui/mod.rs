//! User interface module - terminal detection and formatting.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Decisions that depend on the terminal

pub mod formatter;

pub use formatter::{
    display_error, display_hint, display_status, display_success, json_error, render_banner,
};

/// Whether the banner should be printed.
///
/// Only on an interactive stdout, outside CI, and when not quieted.
///
/// # Arguments
/// * `quiet` - `--quiet` was given
/// * `in_ci` - The `CI` environment variable is set to something non-empty
pub fn should_show_banner(quiet: bool, in_ci: bool) -> bool {
    !quiet && !in_ci && console::Term::stdout().is_term()
}
