// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./shelter.toml` > `~/.config/shelter/shelter.toml` > `/etc/shelter/shelter.toml`
//! with environment variable overrides via `SHELTER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ShelterConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/shelter/shelter.toml` (system-wide)
/// 3. `~/.config/shelter/shelter.toml` (user XDG config)
/// 4. `./shelter.toml` (local directory)
/// 5. `SHELTER_*` environment variables
pub fn load_config() -> Result<ShelterConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ShelterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShelterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ShelterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShelterConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ShelterConfig::default()))
        .merge(Toml::file("/etc/shelter/shelter.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("shelter/shelter.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("shelter.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section-to-dot mapping.
///
/// `Env::split("_")` would turn `SHELTER_STORAGE_DATABASE_PATH` into
/// `storage.database.path`; only the first underscore after the section
/// name is a separator.
fn env_provider() -> Env {
    Env::prefixed("SHELTER_").map(|key| {
        // Keys arrive in their original case (`STORAGE_DATABASE_PATH`).
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("uploads_", "uploads.", 1)
            .replacen("listing_", "listing.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SHELTER_STORAGE_DATABASE_PATH", "/tmp/jail.db");
            jail.set_env("SHELTER_LISTING_PER_PAGE", "12");
            let config: ShelterConfig = Figment::new()
                .merge(Serialized::defaults(ShelterConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.storage.database_path, "/tmp/jail.db");
            assert_eq!(config.listing.per_page, 12);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "shelter.toml",
                r#"
                [app]
                log_level = "warn"

                [uploads]
                directory = "/srv/uploads"
                "#,
            )?;
            jail.set_env("SHELTER_APP_LOG_LEVEL", "debug");
            jail.set_env("SHELTER_UPLOADS_MAX_UPLOAD_BYTES", "2048");
            let config = load_config_from_path(Path::new("shelter.toml"))?;
            assert_eq!(config.app.log_level, "debug");
            assert_eq!(config.uploads.directory, "/srv/uploads");
            assert_eq!(config.uploads.max_upload_bytes, 2048);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "shelter.toml",
                r#"
                [app]
                log_level = "debug"
                "#,
            )?;
            let config = load_config_from_path(Path::new("shelter.toml"))?;
            assert_eq!(config.app.log_level, "debug");
            assert!(config.storage.wal_mode);
            Ok(())
        });
    }
}
