//! Input validation and sanitizing. Rejections happen here, before anything
//! reaches storage.

use crate::error::AppError;

const MAX_PROMPT_CHARS: usize = 500;
const MIN_PROMPT_CHARS: usize = 5;
const MAX_OPTION_CHARS: usize = 200;
const MAX_CATEGORY_CHARS: usize = 50;
const MAX_SANITIZED_CHARS: usize = 1000;
const MAX_SEARCH_CHARS: usize = 100;

fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        match rest[start..].find('>') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                // unclosed bracket is plain text
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Strip `<...>` markup, collapse whitespace, cap the length.
pub fn sanitize(text: &str) -> String {
    let stripped = strip_markup(text);
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_SANITIZED_CHARS).collect()
}

pub fn validate_question(
    prompt: &str,
    options: &[String],
    answer: &str,
    category: &str,
) -> Result<(), AppError> {
    let prompt_len = prompt.trim().chars().count();
    if prompt_len < MIN_PROMPT_CHARS {
        return Err(AppError::Validation(format!(
            "prompt must be at least {} characters",
            MIN_PROMPT_CHARS
        )));
    }
    if prompt_len > MAX_PROMPT_CHARS {
        return Err(AppError::Validation(format!(
            "prompt must not exceed {} characters",
            MAX_PROMPT_CHARS
        )));
    }

    if options.len() != 3 {
        return Err(AppError::Validation("exactly 3 options are required".into()));
    }
    for (i, option) in options.iter().enumerate() {
        let label = char::from(b'A' + i as u8);
        if option.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "option {} must not be empty",
                label
            )));
        }
        if option.trim().chars().count() > MAX_OPTION_CHARS {
            return Err(AppError::Validation(format!(
                "option {} must not exceed {} characters",
                label, MAX_OPTION_CHARS
            )));
        }
    }

    if !matches!(answer, "A" | "B" | "C") {
        return Err(AppError::Validation("answer must be A, B or C".into()));
    }

    if category.trim().chars().count() > MAX_CATEGORY_CHARS {
        return Err(AppError::Validation(format!(
            "category must not exceed {} characters",
            MAX_CATEGORY_CHARS
        )));
    }

    Ok(())
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    let name_len = username.trim().chars().count();
    if name_len < 3 {
        return Err(AppError::Validation(
            "username must be at least 3 characters".into(),
        ));
    }
    if name_len > 50 {
        return Err(AppError::Validation(
            "username must not exceed 50 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "username may only contain letters, digits, _ and -".into(),
        ));
    }

    let pass_len = password.chars().count();
    if pass_len < 4 {
        return Err(AppError::Validation(
            "password must be at least 4 characters".into(),
        ));
    }
    if pass_len > 100 {
        return Err(AppError::Validation(
            "password must not exceed 100 characters".into(),
        ));
    }

    Ok(())
}

/// Search terms are sanitized and truncated, never rejected.
pub fn clean_search_term(term: &str) -> String {
    sanitize(term).chars().take(MAX_SEARCH_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["one".into(), "two".into(), "three".into()]
    }

    #[test]
    fn accepts_reasonable_question() {
        assert!(validate_question("What is Rust?", &options(), "A", "General").is_ok());
    }

    #[test]
    fn rejects_short_prompt() {
        let err = validate_question("Hi?", &options(), "A", "").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn rejects_bad_answer_and_blank_option() {
        assert!(validate_question("What is Rust?", &options(), "D", "").is_err());
        let mut opts = options();
        opts[1] = "  ".into();
        assert!(validate_question("What is Rust?", &opts, "A", "").is_err());
    }

    #[test]
    fn rejects_wrong_option_count() {
        let opts = vec!["one".to_string(), "two".to_string()];
        assert!(validate_question("What is Rust?", &opts, "A", "").is_err());
    }

    #[test]
    fn sanitize_strips_markup_and_collapses_whitespace() {
        assert_eq!(sanitize("a <b>bold</b>   claim"), "a bold claim");
        assert_eq!(sanitize("<script>x</script>safe"), "xsafe");
        assert_eq!(sanitize("tail < open"), "tail < open");
    }

    #[test]
    fn credentials_rules() {
        assert!(validate_credentials("admin", "admin123").is_ok());
        assert!(validate_credentials("ab", "admin123").is_err());
        assert!(validate_credentials("has space", "admin123").is_err());
        assert!(validate_credentials("admin", "abc").is_err());
    }
}
