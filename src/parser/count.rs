use regex::Regex;
use tracing::{info, warn};

use crate::error::{Result, ScrapingError};

const RESULT_COUNT_PATTERN: &str = r"\b(\d+)\s+REALTORS®\s+found";

/// Reads the total agent count out of the directory's summary text.
pub struct ResultCountParser {
    pattern: Regex,
}

impl ResultCountParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(RESULT_COUNT_PATTERN)?,
        })
    }

    /// First `<n> REALTORS® found` phrase in `text`, if any. A matched
    /// number too large for `u64` is a `ParseError`.
    pub fn find_count(&self, text: &str) -> Result<Option<u64>> {
        let Some(digits) = self.pattern.captures(text).and_then(|captures| captures.get(1)) else {
            return Ok(None);
        };

        digits
            .as_str()
            .parse()
            .map(Some)
            .map_err(|e| ScrapingError::ParseError(format!("Invalid result count {:?}: {}", digits.as_str(), e)))
    }

    /// Like `find_count`, but a missing phrase counts as zero results.
    pub fn extract_count(&self, text: &str) -> Result<u64> {
        match self.find_count(text)? {
            Some(number_found) => {
                info!("Extracted number: {}", number_found);
                Ok(number_found)
            }
            None => {
                warn!("No number found");
                Ok(0)
            }
        }
    }
}
