use std::fmt;

use serde::Serialize;

use crate::domain::comment::MAX_CONTENT_LENGTH;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated per-field validation failures for one write attempt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// "Author can't be blank"-style messages, one per failed field.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{} {}", capitalize(e.field), e.message))
            .collect()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn validate_post_content(content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if blank(content) {
        errors.add("content", "can't be blank");
    }
    errors.into_result()
}

pub fn validate_new_comment(author: &str, content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if blank(author) {
        errors.add("author", "can't be blank");
    }
    if blank(content) {
        errors.add("content", "can't be blank");
    } else if content.chars().count() > MAX_CONTENT_LENGTH {
        errors.add(
            "content",
            format!("is too long (maximum is {MAX_CONTENT_LENGTH} characters)"),
        );
    }
    errors.into_result()
}

/// Only fields present in the change set are checked; an empty change set is
/// a valid no-op update.
pub fn validate_comment_update(
    author: Option<&str>,
    content: Option<&str>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(author) = author {
        if blank(author) {
            errors.add("author", "can't be blank");
        }
    }
    if let Some(content) = content {
        if blank(content) {
            errors.add("content", "can't be blank");
        } else if content.chars().count() > MAX_CONTENT_LENGTH {
            errors.add(
                "content",
                format!("is too long (maximum is {MAX_CONTENT_LENGTH} characters)"),
            );
        }
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_post_content() {
        let err = validate_post_content("   ").unwrap_err();
        assert_eq!(err.full_messages(), vec!["Content can't be blank"]);
    }

    #[test]
    fn accepts_valid_comment() {
        assert!(validate_new_comment("joe.doe", "A comment").is_ok());
    }

    #[test]
    fn rejects_blank_comment_fields() {
        let err = validate_new_comment("", "").unwrap_err();
        assert_eq!(err.errors().len(), 2);
        assert_eq!(
            err.to_string(),
            "Author can't be blank, Content can't be blank"
        );
    }

    #[test]
    fn content_length_is_bounded_at_500_characters() {
        let exactly = "x".repeat(500);
        assert!(validate_new_comment("joe", &exactly).is_ok());

        let too_long = "x".repeat(501);
        let err = validate_new_comment("joe", &too_long).unwrap_err();
        assert_eq!(
            err.full_messages(),
            vec!["Content is too long (maximum is 500 characters)"]
        );
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(validate_comment_update(None, None).is_ok());
        assert!(validate_comment_update(Some("joe"), None).is_ok());
        assert!(validate_comment_update(None, Some("")).is_err());
        assert!(validate_comment_update(Some(" "), Some("fine")).is_err());
    }
}
