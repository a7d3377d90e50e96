// crates/tcc-guard-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config and manifest loading tests.
// Purpose: Reduce duplication across integration tests for tcc-guard-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::path::PathBuf;

use tcc_guard_config::ConfigError;
use tempfile::TempDir;

/// Result type used by the config suites.
pub type TestResult = Result<(), String>;

/// Writes `contents` to `name` inside a fresh temporary directory.
///
/// The directory is returned so it outlives the test body.
pub fn write_temp(name: &str, contents: &[u8]) -> Result<(TempDir, PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join(name);
    std::fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Asserts that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err(format!("expected error containing '{needle}'")),
    }
}
