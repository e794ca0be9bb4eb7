// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Photo store wrapper that injects failures.
//!
//! `FailingPhotoStore` delegates to a real [`FsPhotoStore`] but fails
//! `stage_removal` for configured file names, so tests can check that
//! animal deletion leaves rows and files untouched when storage breaks.

use std::collections::HashSet;
use std::sync::Mutex;

use shelter_core::{PhotoStore, ShelterError};
use shelter_workflow::FsPhotoStore;

/// A recorded photo store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoCall {
    Stage(String),
    Restore(String),
    Purge(String),
}

#[derive(Debug)]
pub struct FailingPhotoStore {
    inner: FsPhotoStore,
    fail_on: Mutex<HashSet<String>>,
    calls: Mutex<Vec<PhotoCall>>,
}

impl FailingPhotoStore {
    pub fn new(inner: FsPhotoStore) -> Self {
        Self {
            inner,
            fail_on: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make staging `filename` fail from now on.
    pub fn fail_on(&self, filename: &str) {
        lock(&self.fail_on).insert(filename.to_string());
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        lock(&self.fail_on).clear();
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<PhotoCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: PhotoCall) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PhotoStore for FailingPhotoStore {
    fn stage_removal(&self, filename: &str) -> Result<bool, ShelterError> {
        self.record(PhotoCall::Stage(filename.to_string()));
        if lock(&self.fail_on).contains(filename) {
            return Err(ShelterError::storage(format!(
                "injected failure staging {filename}"
            )));
        }
        self.inner.stage_removal(filename)
    }

    fn restore(&self, filename: &str) -> Result<(), ShelterError> {
        self.record(PhotoCall::Restore(filename.to_string()));
        self.inner.restore(filename)
    }

    fn purge(&self, filename: &str) -> Result<(), ShelterError> {
        self.record(PhotoCall::Purge(filename.to_string()));
        self.inner.purge(filename)
    }
}
