use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapingError>;

#[derive(Error, Debug)]
pub enum ScrapingError {
    #[error("Browser error: {0}")]
    BrowserError(String),

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ScrapingError {
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        ScrapingError::ElementNotFound {
            selector: selector.into(),
        }
    }
}

// Conversion implementations for common error types
impl From<std::io::Error> for ScrapingError {
    fn from(err: std::io::Error) -> Self {
        ScrapingError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for ScrapingError {
    fn from(err: csv::Error) -> Self {
        ScrapingError::StorageError(err.to_string())
    }
}

impl From<toml::de::Error> for ScrapingError {
    fn from(err: toml::de::Error) -> Self {
        ScrapingError::ConfigError(err.to_string())
    }
}

impl From<regex::Error> for ScrapingError {
    fn from(err: regex::Error) -> Self {
        ScrapingError::ParseError(err.to_string())
    }
}

impl From<chromiumoxide::error::CdpError> for ScrapingError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapingError::BrowserError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_message_names_selector() {
        let err = ScrapingError::element_not_found(".search-result");
        assert_eq!(err.to_string(), "Element not found: .search-result");
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ScrapingError = io.into();
        assert!(matches!(err, ScrapingError::StorageError(_)));
    }
}
