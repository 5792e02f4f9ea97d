//! POSIX shell quoting for remote command lines.

/// Wrap `value` in single quotes so a POSIX shell reads it literally.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
