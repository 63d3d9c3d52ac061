//! Typed environment variable lookups

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Failure to interpret an environment variable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {key}: {message}")]
pub struct EnvError {
    pub key: String,
    pub message: String,
}

/// Read a non-empty string variable
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse a variable, `Ok(None)` when it is unset or blank
pub fn env_parse<T>(key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| EnvError {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable() {
        assert_eq!(env_string("STRATEGY_UTILS_TEST_UNSET_VAR"), None);
        assert_eq!(
            env_parse::<f64>("STRATEGY_UTILS_TEST_UNSET_VAR"),
            Ok(None)
        );
    }

    #[test]
    fn test_env_error_display() {
        let err = EnvError {
            key: "STRATEGY_RISK_FREE_RATE".to_string(),
            message: "invalid float literal".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for STRATEGY_RISK_FREE_RATE: invalid float literal"
        );
    }
}
