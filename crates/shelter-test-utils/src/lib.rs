// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for shelter integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - temp database, upload directory and workflow engine
//!   with one user per role
//! - [`FailingPhotoStore`] - photo store that fails on chosen files and
//!   records every call

pub mod harness;
pub mod mock_photos;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_photos::{FailingPhotoStore, PhotoCall};
