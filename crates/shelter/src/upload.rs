// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Copying photo files into the upload directory.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use shelter_core::ShelterError;
use shelter_core::types::NewPhoto;
use uuid::Uuid;

/// MIME type for the accepted image extensions.
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Files copied for one upload. Removed on drop unless [`Uploaded::keep`] is called.
#[derive(Debug)]
pub struct Uploaded {
    pub photos: Vec<NewPhoto>,
    paths: Vec<PathBuf>,
    keep: bool,
}

impl Uploaded {
    pub fn keep(mut self) {
        self.keep = true;
    }
}

impl Drop for Uploaded {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove upload");
            }
        }
    }
}

/// Copy `sources` into `upload_dir`, each under a fresh random name.
///
/// Targets are created with `create_new`, so an existing file is never
/// overwritten.
pub fn copy_photos(
    sources: &[PathBuf],
    upload_dir: &Path,
    max_bytes: u64,
) -> Result<Uploaded, ShelterError> {
    let mut uploaded = Uploaded {
        photos: Vec::with_capacity(sources.len()),
        paths: Vec::with_capacity(sources.len()),
        keep: false,
    };
    for source in sources {
        let Some(mime_type) = mime_for(source) else {
            return Err(ShelterError::Invalid(format!(
                "{} is not a jpeg, png, gif or webp image",
                source.display()
            )));
        };
        let size = std::fs::metadata(source).map_err(ShelterError::storage)?.len();
        if size > max_bytes {
            return Err(ShelterError::Invalid(format!(
                "{} is larger than {max_bytes} bytes",
                source.display()
            )));
        }

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("img")
            .to_ascii_lowercase();
        let filename = format!("{}.{ext}", Uuid::new_v4());
        let target = upload_dir.join(&filename);

        let mut input = std::fs::File::open(source).map_err(ShelterError::storage)?;
        let mut output = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(ShelterError::storage)?;
        uploaded.paths.push(target);
        std::io::copy(&mut input, &mut output).map_err(ShelterError::storage)?;
        uploaded.photos.push(NewPhoto {
            filename,
            mime_type: mime_type.to_string(),
        });
    }
    Ok(uploaded)
}
