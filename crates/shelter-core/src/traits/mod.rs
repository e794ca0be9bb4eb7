// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the workflow engine and its collaborators.

pub mod photos;

pub use photos::PhotoStore;
