use std::{env, fmt::Display, str::FromStr};

use tracing::{debug, warn};

/// Read a non-empty environment variable
pub fn env_string(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or unparsable
pub fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env_string(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default {default}");
            default
        }),
        None => {
            debug!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_missing_uses_default() {
        assert_eq!(env_or::<u16>("SCANSHEET_TEST_UNSET_PORT", 4001), 4001);
    }

    #[test]
    fn test_env_or_parses_value() {
        env::set_var("SCANSHEET_TEST_PORT_PARSE", "8080");
        assert_eq!(env_or::<u16>("SCANSHEET_TEST_PORT_PARSE", 4001), 8080);
        env::remove_var("SCANSHEET_TEST_PORT_PARSE");
    }

    #[test]
    fn test_env_or_invalid_uses_default() {
        env::set_var("SCANSHEET_TEST_PORT_BAD", "not-a-port");
        assert_eq!(env_or::<u16>("SCANSHEET_TEST_PORT_BAD", 4001), 4001);
        env::remove_var("SCANSHEET_TEST_PORT_BAD");
    }
}
