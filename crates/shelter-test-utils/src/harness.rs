// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end workflow testing.
//!
//! `TestHarness` assembles a temp SQLite database, a temp upload directory
//! and an [`AdoptionWorkflow`], and seeds one admin, one moderator and one
//! regular user. Fixture helpers write directly to storage so tests can set
//! up states the workflow itself would refuse to create.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shelter_config::model::StorageConfig;
use shelter_core::types::{NewAnimal, NewPhoto, NewUser};
use shelter_core::{
    AdoptionId, AdoptionStatus, AnimalId, AnimalStatus, Gender, Identity, PhotoStore, Role,
    ShelterError,
};
use shelter_storage::Database;
use shelter_storage::queries::{adoptions, animals, photos, users};
use shelter_workflow::{AdoptionWorkflow, FsPhotoStore};

use crate::mock_photos::FailingPhotoStore;

/// Builder for configuring the test environment.
pub struct TestHarnessBuilder {
    per_page: Option<u32>,
    failing_photos: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            per_page: None,
            failing_photos: false,
        }
    }

    /// Override the listing page size.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Route photo operations through a [`FailingPhotoStore`].
    pub fn with_failing_photos(mut self) -> Self {
        self.failing_photos = true;
        self
    }

    pub async fn build(self) -> Result<TestHarness, ShelterError> {
        let temp_dir = tempfile::TempDir::new().map_err(ShelterError::storage)?;
        let storage_config = StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().to_string(),
            wal_mode: true,
        };
        let db = Database::open_with_config(&storage_config).await?;

        let uploads_dir = temp_dir.path().join("uploads");
        let fs_store = FsPhotoStore::open(&uploads_dir)?;
        let (photo_store, failing) = if self.failing_photos {
            let failing = Arc::new(FailingPhotoStore::new(fs_store));
            (failing.clone() as Arc<dyn PhotoStore>, Some(failing))
        } else {
            (Arc::new(fs_store) as Arc<dyn PhotoStore>, None)
        };

        let mut workflow = AdoptionWorkflow::new(db.clone(), photo_store);
        if let Some(per_page) = self.per_page {
            workflow = workflow.with_per_page(per_page);
        }

        let mut harness = TestHarness {
            db,
            workflow,
            failing_photos: failing,
            uploads_dir,
            storage_config,
            admin: Identity::new(shelter_core::UserId(0), Role::Admin),
            moderator: Identity::new(shelter_core::UserId(0), Role::Moderator),
            visitor: Identity::new(shelter_core::UserId(0), Role::User),
            _temp_dir: temp_dir,
        };
        harness.admin = harness.add_user("admin", Role::Admin).await?;
        harness.moderator = harness.add_user("moderator", Role::Moderator).await?;
        harness.visitor = harness.add_user("visitor", Role::User).await?;
        Ok(harness)
    }
}

/// A complete workflow environment backed by temp storage.
pub struct TestHarness {
    /// Database shared with the workflow.
    pub db: Database,
    pub workflow: AdoptionWorkflow,
    /// Set when built with [`TestHarnessBuilder::with_failing_photos`].
    pub failing_photos: Option<Arc<FailingPhotoStore>>,
    pub uploads_dir: PathBuf,
    /// Storage settings the harness database was opened with.
    pub storage_config: StorageConfig,
    pub admin: Identity,
    pub moderator: Identity,
    /// A regular user.
    pub visitor: Identity,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Default harness.
    pub async fn new() -> Result<Self, ShelterError> {
        Self::builder().build().await
    }

    /// A workflow over its own connection to the same database file, as a
    /// second process would have.
    pub async fn second_workflow(&self) -> Result<AdoptionWorkflow, ShelterError> {
        let db = Database::open_with_config(&self.storage_config).await?;
        let store = FsPhotoStore::open(&self.uploads_dir)?;
        Ok(AdoptionWorkflow::new(db, Arc::new(store)))
    }

    /// Register a user and return their identity.
    pub async fn add_user(&self, username: &str, role: Role) -> Result<Identity, ShelterError> {
        let user = NewUser {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: username.to_string(),
            middle_name: None,
            role,
        };
        let id = self
            .db
            .call(move |conn| Ok(users::insert_user(conn, &user)?))
            .await?;
        Ok(Identity::new(id, role))
    }

    /// Insert an animal directly, bypassing workflow validation.
    pub async fn add_animal(
        &self,
        name: &str,
        status: AnimalStatus,
    ) -> Result<AnimalId, ShelterError> {
        let animal = NewAnimal {
            name: name.to_string(),
            description: format!("{name} is waiting for a home"),
            age_months: 24,
            breed: "Mixed".to_string(),
            gender: Gender::Female,
            status,
        };
        self.db
            .call(move |conn| Ok(animals::insert_animal(conn, &animal)?))
            .await
    }

    /// Write a photo file into the upload directory and attach it to `animal_id`.
    pub async fn add_photo(&self, animal_id: AnimalId, filename: &str) -> Result<(), ShelterError> {
        std::fs::write(self.uploads_dir.join(filename), b"\xFF\xD8\xFFphoto")
            .map_err(ShelterError::storage)?;
        let photo = NewPhoto {
            filename: filename.to_string(),
            mime_type: "image/jpeg".to_string(),
        };
        self.db
            .call(move |conn| {
                photos::insert_photo(conn, animal_id, &photo)?;
                Ok(())
            })
            .await
    }

    pub fn photo_path(&self, filename: &str) -> PathBuf {
        self.uploads_dir.join(filename)
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Current status of a request. Panics if it does not exist.
    pub async fn request_status(&self, id: AdoptionId) -> AdoptionStatus {
        self.db
            .call(move |conn| Ok(adoptions::get_request(conn, id)?))
            .await
            .expect("query request")
            .expect("request exists")
            .status
    }

    /// Current status of an animal, `None` once deleted.
    pub async fn animal_status(&self, id: AnimalId) -> Option<AnimalStatus> {
        self.db
            .call(move |conn| Ok(animals::get_animal(conn, id)?))
            .await
            .expect("query animal")
            .map(|a| a.status)
    }

    /// Number of rows in `table`.
    pub async fn count_rows(&self, table: &'static str) -> i64 {
        self.db
            .call(move |conn| {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?)
            })
            .await
            .expect("count rows")
    }

    /// Number of accepted requests for `animal_id`.
    pub async fn accepted_count(&self, animal_id: AnimalId) -> i64 {
        self.db
            .call(move |conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM adoptions WHERE animal_id = ?1 AND status = 'accepted'",
                    [animal_id.0],
                    |row| row.get(0),
                )?)
            })
            .await
            .expect("count accepted")
    }
}
