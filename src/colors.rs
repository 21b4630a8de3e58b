//! Colour policy for diagnostics.
//!
//! Only stderr is ever coloured: stdout carries the report and must stay
//! machine-readable. Follows the NO_COLOR standard (https://no-color.org/)
//! and the CLICOLOR / CLICOLOR_FORCE conventions.
use colored::{ColoredString, Colorize, control};

/// Decide once, early in `main`, whether diagnostics get colours
pub fn init_colors() {
    control::set_override(colors_enabled(
        |name| std::env::var(name).ok(),
        std::io::IsTerminal::is_terminal(&std::io::stderr()),
    ));
}

/// NO_COLOR wins, then CLICOLOR_FORCE, then CLICOLOR=0, then TTY detection
fn colors_enabled(var: impl Fn(&str) -> Option<String>, is_tty: bool) -> bool {
    if var("NO_COLOR").is_some() {
        return false;
    }
    if var("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        return true;
    }
    if var("CLICOLOR").is_some_and(|v| v == "0") {
        return false;
    }
    is_tty
}

/// Prefix for fatal messages on stderr
pub fn error_prefix() -> ColoredString {
    "error:".red().bold()
}
