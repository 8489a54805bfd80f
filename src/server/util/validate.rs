//! Input validation helpers returning `AppError::BadRequest`.

use crate::server::error::AppError;

/// Trims `value` and rejects it when empty or longer than `max_chars`.
pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_chars {
        return Err(AppError::bad_request(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(trimmed.to_string())
}

/// Like `required_text` for optional fields; blank input becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<String>,
    max_chars: usize,
) -> Result<Option<String>, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => required_text(field, &v, max_chars).map(Some),
        _ => Ok(None),
    }
}

/// Removes duplicates while keeping first-seen order.
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_limits_text() {
        assert_eq!(required_text("name", "  Ops ", 50).unwrap(), "Ops");
        assert!(required_text("name", "   ", 50).is_err());
        assert!(required_text("name", "abcdef", 5).is_err());
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(optional_text("note", Some("  ".to_string()), 10).unwrap(), None);
        assert_eq!(
            optional_text("note", Some(" hi ".to_string()), 10).unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn dedups_keeping_order() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
