// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed [`PhotoStore`].
//!
//! Photos live directly under the upload directory. Staged removals are
//! moved into a `.trash` subdirectory on the same filesystem, so staging
//! and restoring are plain renames.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use shelter_core::{PhotoStore, ShelterError};

const TRASH_DIR: &str = ".trash";

/// Photo files stored under one directory.
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
    root: PathBuf,
}

impl FsPhotoStore {
    /// Use `root` as the upload directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ShelterError> {
        let root = root.into();
        std::fs::create_dir_all(root.join(TRASH_DIR)).map_err(ShelterError::storage)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `filename` is served from.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, ShelterError> {
        validate_filename(filename)?;
        Ok(self.root.join(filename))
    }

    fn trash_path(&self, filename: &str) -> PathBuf {
        self.root.join(TRASH_DIR).join(filename)
    }
}

/// Accept only bare file names: no separators, no parent or hidden entries.
pub fn validate_filename(filename: &str) -> Result<(), ShelterError> {
    let bad = filename.is_empty()
        || filename.starts_with('.')
        || filename.contains(['/', '\\', '\0'])
        || Path::new(filename).file_name().and_then(|n| n.to_str()) != Some(filename);
    if bad {
        return Err(ShelterError::Invalid(format!(
            "photo filename `{filename}` is not a plain file name"
        )));
    }
    Ok(())
}

impl PhotoStore for FsPhotoStore {
    fn stage_removal(&self, filename: &str) -> Result<bool, ShelterError> {
        let live = self.path_for(filename)?;
        match std::fs::rename(&live, self.trash_path(filename)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ShelterError::storage(e)),
        }
    }

    fn restore(&self, filename: &str) -> Result<(), ShelterError> {
        let live = self.path_for(filename)?;
        std::fs::rename(self.trash_path(filename), live).map_err(ShelterError::storage)
    }

    fn purge(&self, filename: &str) -> Result<(), ShelterError> {
        validate_filename(filename)?;
        match std::fs::remove_file(self.trash_path(filename)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShelterError::storage(e)),
        }
    }
}
