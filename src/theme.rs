//! Console color styling as a pure formatting helper.
//!
//! No process-wide state: callers pass a [`Style`] and get a decorated
//! string back.

/// Resets color and attributes back to the terminal default.
pub const RESET: &str = "\x1b[0m";

const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Roles the console output distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Menu body text.
    Menu,
    /// Input prompt. Leaves the terminal in the echo color so the text the
    /// user types is tinted too; the shell emits [`RESET`] after reading.
    Prompt,
    /// Error and warning messages.
    Error,
}

/// Decorates `text` for the given role.
pub fn paint(style: Style, text: &str) -> String {
    match style {
        Style::Menu => format!("{}{}{}", BLUE, text, RESET),
        Style::Prompt => format!("{}{}{}", GREEN, text, YELLOW),
        Style::Error => format!("{}{}{}", RED, text, RESET),
    }
}
