use std::fmt;

use thiserror::Error;
use url::Url;

/// Built-in topic list location, used when nothing valid is persisted.
pub const DEFAULT_SOURCE_URL: &str = "https://tednewardsandbox.site44.com/questions.json";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceLocationError {
    #[error("source location cannot be empty")]
    Empty,

    #[error("source location is not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported source location scheme: {0}")]
    UnsupportedScheme(String),
}

/// Validated location of the topic list.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceLocation(Url);

impl SourceLocation {
    /// Parse and validate a location string.
    ///
    /// # Errors
    ///
    /// Returns `SourceLocationError` if the value is blank, not a URL, or not
    /// `http`/`https`.
    pub fn parse(raw: &str) -> Result<Self, SourceLocationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SourceLocationError::Empty);
        }
        let url =
            Url::parse(trimmed).map_err(|err| SourceLocationError::InvalidUrl(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(SourceLocationError::UnsupportedScheme(other.to_string())),
        }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0.as_str() == DEFAULT_SOURCE_URL
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_SOURCE_URL).expect("default source URL is valid"))
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceLocation({})", self.0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_sandbox_url() {
        let location = SourceLocation::default();
        assert_eq!(location.as_str(), DEFAULT_SOURCE_URL);
        assert!(location.is_default());
    }

    #[test]
    fn parse_trims_and_accepts_https() {
        let location = SourceLocation::parse("  https://example.com/quiz.json ").unwrap();
        assert_eq!(location.as_str(), "https://example.com/quiz.json");
        assert!(!location.is_default());
    }

    #[test]
    fn parse_rejects_blank_and_garbage() {
        assert_eq!(SourceLocation::parse("  ").unwrap_err(), SourceLocationError::Empty);
        assert!(matches!(
            SourceLocation::parse("not a url").unwrap_err(),
            SourceLocationError::InvalidUrl(_)
        ));
        assert!(matches!(
            SourceLocation::parse("ftp://example.com/q.json").unwrap_err(),
            SourceLocationError::UnsupportedScheme(_)
        ));
    }
}
