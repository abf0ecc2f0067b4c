//! Domain error types

use thiserror::Error;

/// Maximum accepted query length, in characters.
pub const MAX_QUERY_CHARS: usize = 1000;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid export format '{0}' (expected json, txt or md)")]
    InvalidExportFormat(String),

    #[error("Invalid locale '{0}' (expected pt-BR or en)")]
    InvalidLocale(String),
}

/// Validate a user query: non-empty after trimming and at most
/// [`MAX_QUERY_CHARS`] characters.
pub fn validate_query(query: &str) -> Result<&str, DomainError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidQuery("query must not be empty".to_string()));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_QUERY_CHARS {
        return Err(DomainError::InvalidQuery(format!(
            "query has {} characters (max {})",
            chars, MAX_QUERY_CHARS
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_trims() {
        assert_eq!(validate_query("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn test_validate_query_rejects_blank() {
        assert!(matches!(
            validate_query("   \n"),
            Err(DomainError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_validate_query_length_counts_chars() {
        // 1000 multibyte chars is still within the limit
        let ok = "ç".repeat(MAX_QUERY_CHARS);
        assert!(validate_query(&ok).is_ok());

        let too_long = "a".repeat(MAX_QUERY_CHARS + 1);
        let err = validate_query(&too_long).unwrap_err();
        assert!(err.to_string().contains("1001"));
    }
}
