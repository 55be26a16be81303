//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic for status lines.
//! `format_*` functions build strings and are testable; `display_*`
//! functions only print them.

use console::style;

use crate::domain::FieldChange;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Status line for one rewritten field, e.g.
/// `iOS project.pbxproj code: 12 -> 13`
pub fn format_change(change: &FieldChange) -> String {
    format!(
        "{} {}: {} -> {}",
        change.file,
        change.field,
        style(change.previous.as_deref().unwrap_or("(none)")).red(),
        style(&change.next).green()
    )
}

/// Print every change of a run.
///
/// # Arguments
/// * `changes` - Changes in the order they were applied
/// * `written` - Whether the files were written, or this is a preview
pub fn display_changes(changes: &[FieldChange], written: bool) {
    if changes.is_empty() {
        display_status("No fields changed");
        return;
    }

    let heading = if written {
        "Updated version fields:"
    } else {
        "Dry run, files left untouched:"
    };
    println!("\n{}", style(heading).bold());
    for change in changes {
        println!("  {}", format_change(change));
    }
}
