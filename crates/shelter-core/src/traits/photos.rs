// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Photo file storage used when animals are deleted.

use crate::error::ShelterError;

/// Storage for uploaded photo files.
///
/// Removal is two-phase so that deleting an animal can be rolled back:
/// files are first staged (moved out of the served location), then either
/// purged after the database commit or restored if anything fails.
///
/// Methods are synchronous because they run on the database thread, inside
/// the open transaction.
pub trait PhotoStore: Send + Sync + 'static {
    /// Move `filename` aside. Returns `false` if no such file exists.
    fn stage_removal(&self, filename: &str) -> Result<bool, ShelterError>;

    /// Put a staged file back in place.
    fn restore(&self, filename: &str) -> Result<(), ShelterError>;

    /// Permanently delete a staged file.
    fn purge(&self, filename: &str) -> Result<(), ShelterError>;
}
