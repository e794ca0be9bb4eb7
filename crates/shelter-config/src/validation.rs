// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express.
//! All problems are collected; validation does not stop at the first one.

use crate::diagnostic::ConfigError;
use crate::model::ShelterConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &ShelterConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.app.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "app.log_level `{}` must be one of: {}",
            config.app.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.uploads.directory.trim().is_empty() {
        errors.push(ConfigError::validation("uploads.directory must not be empty"));
    }

    if config.uploads.max_upload_bytes == 0 {
        errors.push(ConfigError::validation(
            "uploads.max_upload_bytes must be greater than zero",
        ));
    }

    if !(1..=100).contains(&config.listing.per_page) {
        errors.push(ConfigError::validation(format!(
            "listing.per_page must be between 1 and 100, got {}",
            config.listing.per_page
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
