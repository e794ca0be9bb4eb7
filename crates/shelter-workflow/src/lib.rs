// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adoption workflow for the shelter.
//!
//! [`AdoptionWorkflow`] owns the state machine for adoption requests and the
//! animal lifecycle operations that interact with it. Role checks live in
//! [`policy`]; photo files are handled through a [`shelter_core::PhotoStore`],
//! with [`FsPhotoStore`] as the filesystem implementation.

pub mod engine;
pub mod files;
pub mod policy;

pub use engine::AdoptionWorkflow;
pub use files::FsPhotoStore;
pub use policy::{Operation, authorize};
