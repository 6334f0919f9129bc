//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, list, status) and shared utilities (open_db)
//! - `entry` - Manual transaction entry (add)
//! - `import` - CSV import command

pub mod core;
pub mod entry;
pub mod import;

// Re-export command functions for main.rs
pub use core::*;
pub use entry::*;
pub use import::*;

/// Truncate a string to a maximum number of characters, adding "..." if
/// truncated. Counts chars, not bytes, so multibyte descriptions never
/// split mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
