use std::{num::ParseIntError, time::Duration};

/// Environment variable holding the per-request timeout, in seconds.
pub const FETCH_TIMEOUT_ENV_VAR: &str = "SITEMAP_FETCH_TIMEOUT_S";

/// Retrieves the per-request timeout from the environment.
/// `Ok(None)` when the variable is unset or blank: requests then use the transport's default.
pub fn fetch_timeout() -> Result<Option<Duration>, FetchTimeoutError> {
    match std::env::var(FETCH_TIMEOUT_ENV_VAR) {
        Ok(v) => parse_timeout_secs(&v),
        Err(_) => Ok(None),
    }
}

/// Parses a whole number of seconds. Blank means "no timeout"; zero is rejected.
pub fn parse_timeout_secs(value: &str) -> Result<Option<Duration>, FetchTimeoutError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let secs = value.parse::<u64>()?;
    if secs == 0 {
        return Err(FetchTimeoutError::NonPositive);
    }
    Ok(Some(Duration::from_secs(secs)))
}

#[derive(Debug)]
pub enum FetchTimeoutError {
    ParseIntError(ParseIntError),
    NonPositive,
}

impl std::error::Error for FetchTimeoutError {}

impl From<ParseIntError> for FetchTimeoutError {
    fn from(error: ParseIntError) -> Self {
        Self::ParseIntError(error)
    }
}

impl std::fmt::Display for FetchTimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::ParseIntError(e) => write!(f, "{} must be a whole number of seconds: {}", FETCH_TIMEOUT_ENV_VAR, e),
            Self::NonPositive => write!(f, "{} must be a positive number", FETCH_TIMEOUT_ENV_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_secs() {
        assert_eq!(parse_timeout_secs("30").unwrap(), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout_secs(" 7 ").unwrap(), Some(Duration::from_secs(7)));
        assert_eq!(parse_timeout_secs("").unwrap(), None);
        assert_eq!(parse_timeout_secs("   ").unwrap(), None);
        assert!(matches!(parse_timeout_secs("0"), Err(FetchTimeoutError::NonPositive)));
        assert!(matches!(parse_timeout_secs("soon"), Err(FetchTimeoutError::ParseIntError(_))));
        assert!(matches!(parse_timeout_secs("-5"), Err(FetchTimeoutError::ParseIntError(_))));
    }
}
