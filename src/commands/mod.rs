//! CLI command implementations for sqlkv.
//!
//! - [`kv`] - Local key-value commands (get/set/del/rename/keys/edit/import/export)
//! - [`serve`] - HTTP query endpoint over a database file

pub mod kv;
pub mod serve;

use anyhow::{Context, Result};
use std::process::Command;

/// Run a command with inherited stdio, failing on a non-zero exit.
pub fn run_command(program: &str, args: &[&str]) -> Result<()> {
    tracing::debug!(program, ?args, "Running command");

    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("Failed to execute '{program}'"))?;

    if !status.success() {
        anyhow::bail!("Command '{program}' failed with status: {status}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_run_command_status() {
        assert!(run_command("true", &[]).is_ok());
        assert!(run_command("false", &[]).is_err());
    }

    #[test]
    fn test_run_command_missing_program() {
        let err = run_command("sqlkv-definitely-not-a-program", &[]).unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
    }
}
