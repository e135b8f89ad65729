/// Treats missing and blank values alike.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Emails are compared trimmed and lowercased.
pub fn normalize_email(value: Option<String>) -> Option<String> {
    present(value).map(|v| v.trim().to_lowercase())
}
