//! Icons and glyphs used throughout the UI.

// Spinner animation frames (braille characters)
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// Selection indicator in the label picker
pub const SELECTOR: &str = "▶ ";

// Cursor
pub const CURSOR: &str = "█";

// Checkboxes
pub const CHECKED: &str = "[x]";
pub const UNCHECKED: &str = "[ ]";

// Notice icons
pub const NOTICE_INFO: &str = "✓";
pub const NOTICE_ERROR: &str = "✗";

pub const SEPARATOR_CHAR: &str = "─";
