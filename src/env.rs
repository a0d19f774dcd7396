//! Environment variable helpers.

use anyhow::Result;

/// Read a required environment variable.
///
/// Unset and empty are both errors; there is no fallback value.
///
/// # Errors
///
/// Returns an error naming the variable if it is missing or empty.
pub fn ensure_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => anyhow::bail!("Environment variable {name} is empty"),
        Err(_) => anyhow::bail!("Environment variable {name} is not set"),
    }
}
