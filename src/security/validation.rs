//! Name validation
//!
//! Handles file name checks shared by the security gate and the storage backend.

/// Validate that a file name is safe to place directly under the drive root
/// (no directory traversal, no separators, no control bytes).
pub fn is_safe_name(name: &str) -> bool {
    !name.trim().is_empty()
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
        && !name.chars().any(char::is_control)
}

/// Sanitize a filename: trims surrounding whitespace and lower-cases the extension.
///
/// Returns `None` when the trimmed name is not safe.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let trimmed = filename.trim();
    if !is_safe_name(trimmed) {
        return None;
    }

    match trimmed.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            Some(format!("{}.{}", stem, ext.to_ascii_lowercase()))
        }
        _ => Some(trimmed.to_string()),
    }
}
