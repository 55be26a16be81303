//! User interface module - status output for the command line.
//!
//! All printing goes through [formatter]; the library core never prints.

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_changes, display_error, display_status, display_success, format_change,
};
