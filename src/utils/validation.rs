//! Validation helpers for names and verse labels.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Invalid scheme name: {0:?} (allowed: letters, digits, '.', '_', '-')")]
    InvalidName(String),

    #[error("Invalid scheme alias: {0:?} (allowed: letters, digits, '.', '_', '-')")]
    InvalidAlias(String),
}

/// Check whether a string is a valid scheme name or alias:
/// non-empty, ASCII letters/digits plus `.`, `_`, `-`.
#[must_use]
pub fn is_valid_scheme_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Validate a scheme name, returning it on success.
///
/// # Errors
///
/// Returns [`NameError::InvalidName`] when the name contains characters
/// outside the allowed set or is empty.
pub fn validate_scheme_name(s: &str) -> Result<&str, NameError> {
    if is_valid_scheme_name(s) {
        Ok(s)
    } else {
        Err(NameError::InvalidName(s.to_string()))
    }
}

/// Validate a scheme alias, returning it on success.
///
/// # Errors
///
/// Returns [`NameError::InvalidAlias`] for an empty or malformed alias.
pub fn validate_scheme_alias(s: &str) -> Result<&str, NameError> {
    if is_valid_scheme_name(s) {
        Ok(s)
    } else {
        Err(NameError::InvalidAlias(s.to_string()))
    }
}

/// Check whether a string is a valid verse label.
///
/// The grammar follows the label forms found in real editions: a leading
/// nonzero digit, then digits and the separators `,` `/` `.` `-`, with an
/// optional single trailing letter (`a`-`z`, or `G` for Greek additions).
#[must_use]
pub fn is_valid_verse_label(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if ('1'..='9').contains(&c) => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    for (i, c) in rest.iter().enumerate() {
        let is_last = i == rest.len() - 1;
        let in_body = c.is_ascii_digit() || matches!(c, ',' | '/' | '.' | '-');
        if in_body {
            continue;
        }
        if is_last && (c.is_ascii_lowercase() || *c == 'G') {
            continue;
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_scheme_name() {
        assert!(is_valid_scheme_name("KJV"));
        assert!(is_valid_scheme_name("Luther-1912"));
        assert!(is_valid_scheme_name("nrsv_a.1"));

        assert!(!is_valid_scheme_name(""));
        assert!(!is_valid_scheme_name("with space"));
        assert!(!is_valid_scheme_name("slash/name"));
    }

    #[test]
    fn test_is_valid_verse_label() {
        assert!(is_valid_verse_label("1"));
        assert!(is_valid_verse_label("176"));
        assert!(is_valid_verse_label("5a"));
        assert!(is_valid_verse_label("41,6"));
        assert!(is_valid_verse_label("13-15a"));
        assert!(is_valid_verse_label("1/t"));
        assert!(is_valid_verse_label("12.1"));
        assert!(is_valid_verse_label("6G"));

        assert!(!is_valid_verse_label(""));
        assert!(!is_valid_verse_label("0"));
        assert!(!is_valid_verse_label("01")); // leading zero
        assert!(!is_valid_verse_label("a1"));
        assert!(!is_valid_verse_label("1a2")); // letter only allowed last
        assert!(!is_valid_verse_label("5A"));
    }
}
