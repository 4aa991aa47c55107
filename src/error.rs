//! Typed error kinds shared across the catalog.

use std::fmt;

/// Everything a catalog command can fail with. Validation errors are
/// recovered by re-prompting; the rest abort the current command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Validation(String),
    NotFound(String),
    Duplicate(String),
    Storage(String),
    ExternalService(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Validation(message) => write!(f, "invalid input: {}", message),
            CatalogError::NotFound(title) => {
                write!(f, "no movie found for \"{}\"", title)
            }
            CatalogError::Duplicate(title) => {
                write!(f, "the movie \"{}\" is already in the catalog", title)
            }
            CatalogError::Storage(message) => write!(f, "storage failure: {}", message),
            CatalogError::ExternalService(message) => {
                write!(f, "metadata service failure: {}", message)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogError;

    #[test]
    fn test_display_carries_the_failing_subject() {
        let err = CatalogError::Duplicate("Inception".to_string());
        assert_eq!(
            err.to_string(),
            "the movie \"Inception\" is already in the catalog"
        );
    }

    #[test]
    fn test_sqlite_errors_convert_to_storage_kind() {
        let err: CatalogError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, CatalogError::Storage(_)));
    }
}
