//! Shared helper functions for CLI commands

use console::style;

use crate::core::entry::EntryId;
use crate::core::notice::Notice;

/// Format an EntryId for display, truncating the ULID
///
/// Full ids are 30 characters; lists show the prefix and the first 9 ULID
/// characters followed by "...".
pub fn format_short_id(id: &EntryId) -> String {
    truncate_str(&id.to_string(), 16)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print queued notices to stderr so stdout stays pipeable
///
/// `quiet` suppresses success notices; errors are always shown.
pub fn print_notices(notices: &[Notice], quiet: bool) {
    for notice in notices {
        if notice.is_error() || !quiet {
            eprintln!("{}", notice);
        }
    }
}

/// Print a dimmed hint line unless quiet
pub fn hint(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", style(message).dim());
    }
}
