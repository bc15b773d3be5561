use std::io::{self, BufRead, Write};

use tracing::warn;

/// Checks a project or page name is usable as a directory and URL path
/// segment. Returns the reason when it is not.
pub fn validate_file_name(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("please enter a value");
    }
    if value != value.to_lowercase() {
        return Err("value must be lowercase");
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err("value must be URL-safe (only letters, numbers, - and _ allowed)");
    }
    if value.starts_with('.') || value.starts_with('_') {
        return Err("value cannot begin with a dot or an underscore");
    }
    Ok(())
}

/// Asks on stdout and reads one answer from `input`. Anything but `y`/`yes`
/// declines, including an unreadable answer.
pub fn confirm_removal(packages: &[String], input: &mut impl BufRead) -> bool {
    let subject = if packages.len() > 1 { "their" } else { "its" };
    println!(
        "Are you sure you want to remove {} and {} associated packages and configuration files? (y/n)",
        packages.join(", "),
        subject
    );
    if let Err(err) = io::stdout().flush() {
        warn!("Failed to show the confirmation prompt: {err}");
    }
    let mut answer = String::new();
    if let Err(err) = input.read_line(&mut answer) {
        warn!("Failed to read an answer, treating it as 'n': {err}");
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
