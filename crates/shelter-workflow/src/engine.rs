// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The adoption workflow engine.
//!
//! Every mutating operation checks the access policy first, then runs as a
//! single SQLite transaction on the shared single-writer connection. Since
//! that connection serializes all transactions, concurrent approvals for
//! the same animal are resolved first-committer-wins: the later approval
//! finds its request already `rejected_adopted` and fails with
//! [`ConflictKind::RequestClosed`]. Transactions begin IMMEDIATE, so the
//! same holds when separate processes share one database file: the later
//! writer waits for the lock and then sees the committed cascade.
//!
//! Animal status is not changed when a request is submitted. It moves to
//! `adopted` only when a request is approved.

use std::sync::Arc;

use shelter_core::types::{
    AdoptionView, AnimalDetails, AnimalQuery, AnimalSearch, AnimalSummary, AnimalUpdate,
    NewAnimal, NewPhoto, NewUser, Page, Photo,
};
use shelter_core::{
    AdoptionId, AdoptionStatus, AnimalId, AnimalStatus, ConflictKind, Identity, PhotoStore,
    Role, ShelterError,
};
use shelter_storage::queries::{adoptions, animals, is_unique_violation, photos, users};
use shelter_storage::{begin_immediate, Database, TxError};
use tracing::{info, warn};

use crate::files::validate_filename;
use crate::policy::{authorize, permits, Operation};

/// Default listing page size.
pub const DEFAULT_PER_PAGE: u32 = 9;

const MAX_NAME_LEN: usize = 100;
const MAX_CONTACT_LEN: usize = 500;

/// Runs adoption and animal-management operations against one database.
///
/// Cloning is cheap; clones share the database thread and photo store.
#[derive(Clone)]
pub struct AdoptionWorkflow {
    db: Database,
    photos: Arc<dyn PhotoStore>,
    per_page: u32,
}

impl std::fmt::Debug for AdoptionWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdoptionWorkflow")
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl AdoptionWorkflow {
    pub fn new(db: Database, photos: Arc<dyn PhotoStore>) -> Self {
        Self {
            db,
            photos,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Override the listing page size. Zero is ignored.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        if per_page > 0 {
            self.per_page = per_page;
        }
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // --- Users ---

    /// Register a user. The very first user may be registered without an
    /// identity and must be an admin; after that only admins register users.
    pub async fn register_user(
        &self,
        actor: Option<&Identity>,
        mut user: NewUser,
    ) -> Result<Identity, ShelterError> {
        user.username = user.username.trim().to_string();
        user.first_name = user.first_name.trim().to_string();
        user.last_name = user.last_name.trim().to_string();
        if user.username.is_empty() || user.first_name.is_empty() || user.last_name.is_empty() {
            return Err(ShelterError::Invalid(
                "username, first name and last name are required".into(),
            ));
        }

        let actor = actor.copied();
        let role = user.role;
        let user_id = self
            .db
            .transaction(move |tx| {
                if users::count_users(tx)? == 0 {
                    if role != Role::Admin {
                        return Err(ShelterError::Invalid(
                            "the first registered user must be an admin".into(),
                        )
                        .into());
                    }
                } else {
                    authorize(actor.as_ref(), Operation::ManageUsers)?;
                }
                users::insert_user(tx, &user).map_err(|e| {
                    if is_unique_violation(&e) {
                        TxError::from(ShelterError::Invalid(format!(
                            "username `{}` is taken",
                            user.username
                        )))
                    } else {
                        TxError::from(e)
                    }
                })
            })
            .await?;

        info!(user_id = %user_id, %role, "user registered");
        Ok(Identity::new(user_id, role))
    }

    /// Resolve a username to the identity the workflow acts as.
    pub async fn identity_for(&self, username: &str) -> Result<Identity, ShelterError> {
        let name = username.to_string();
        self.db
            .call(move |conn| Ok(users::get_user_by_username(conn, &name)?))
            .await?
            .map(|user| user.identity())
            .ok_or_else(|| ShelterError::not_found("user", username))
    }

    // --- Adoption requests ---

    /// Submit an adoption request for `animal_id` on behalf of `actor`.
    ///
    /// Fails with `NotFound` for an unknown animal, `Conflict(AnimalUnavailable)`
    /// unless the animal is `available` or `adoption`, and
    /// `Conflict(DuplicateRequest)` if the actor already has a request for
    /// this animal in any status.
    pub async fn submit_request(
        &self,
        actor: Option<&Identity>,
        animal_id: AnimalId,
        contact_info: &str,
    ) -> Result<AdoptionId, ShelterError> {
        let actor = authorize(actor, Operation::SubmitRequest)?;
        let contact_info = contact_info.trim().to_string();
        if contact_info.is_empty() {
            return Err(ShelterError::Invalid("contact information is required".into()));
        }
        if contact_info.chars().count() > MAX_CONTACT_LEN {
            return Err(ShelterError::Invalid(format!(
                "contact information must be at most {MAX_CONTACT_LEN} characters"
            )));
        }

        let user_id = actor.user_id;
        let request_id = self
            .db
            .transaction(move |tx| {
                let animal = animals::get_animal(tx, animal_id)?
                    .ok_or_else(|| ShelterError::not_found("animal", animal_id))?;
                if !animal.status.is_adoptable() {
                    return Err(ShelterError::Conflict(ConflictKind::AnimalUnavailable).into());
                }
                if adoptions::find_request(tx, animal_id, user_id)?.is_some() {
                    return Err(ShelterError::Conflict(ConflictKind::DuplicateRequest).into());
                }
                adoptions::insert_request(tx, animal_id, user_id, &contact_info).map_err(|e| {
                    if is_unique_violation(&e) {
                        TxError::from(ShelterError::Conflict(ConflictKind::DuplicateRequest))
                    } else {
                        TxError::from(e)
                    }
                })
            })
            .await?;

        info!(
            request_id = %request_id,
            animal_id = %animal_id,
            user_id = %user_id,
            "adoption request submitted"
        );
        Ok(request_id)
    }

    /// Accept a request: the request becomes `accepted`, its animal
    /// `adopted`, and every other pending request for the animal
    /// `rejected_adopted`, all in one transaction.
    ///
    /// Approving an already-accepted request re-applies the same end state.
    pub async fn approve_request(
        &self,
        actor: Option<&Identity>,
        request_id: AdoptionId,
    ) -> Result<(), ShelterError> {
        let actor = authorize(actor, Operation::ApproveRequest)?;

        let (animal_id, auto_rejected) = self
            .db
            .transaction(move |tx| {
                let request = adoptions::get_request(tx, request_id)?
                    .ok_or_else(|| ShelterError::not_found("adoption request", request_id))?;
                match request.status {
                    AdoptionStatus::Pending | AdoptionStatus::Accepted => {}
                    AdoptionStatus::Rejected | AdoptionStatus::RejectedAdopted => {
                        return Err(ShelterError::Conflict(ConflictKind::RequestClosed).into());
                    }
                }

                adoptions::set_request_status(tx, request_id, AdoptionStatus::Accepted).map_err(
                    |e| {
                        // Another request for this animal already holds the accepted slot.
                        if is_unique_violation(&e) {
                            TxError::from(ShelterError::Conflict(ConflictKind::RequestClosed))
                        } else {
                            TxError::from(e)
                        }
                    },
                )?;
                animals::set_animal_status(tx, request.animal_id, AnimalStatus::Adopted)?;
                let auto_rejected =
                    adoptions::reject_pending_siblings(tx, request.animal_id, request_id)?;
                Ok((request.animal_id, auto_rejected))
            })
            .await?;

        info!(
            request_id = %request_id,
            animal_id = %animal_id,
            moderator_id = %actor.user_id,
            auto_rejected,
            "adoption request approved"
        );
        Ok(())
    }

    /// Reject a pending request. Animal status and other requests are untouched.
    ///
    /// Rejecting an already-rejected request is a no-op; accepted and
    /// auto-rejected requests are closed.
    pub async fn reject_request(
        &self,
        actor: Option<&Identity>,
        request_id: AdoptionId,
    ) -> Result<(), ShelterError> {
        let actor = authorize(actor, Operation::RejectRequest)?;

        self.db
            .transaction(move |tx| {
                let request = adoptions::get_request(tx, request_id)?
                    .ok_or_else(|| ShelterError::not_found("adoption request", request_id))?;
                match request.status {
                    AdoptionStatus::Pending => {
                        adoptions::set_request_status(tx, request_id, AdoptionStatus::Rejected)?;
                        Ok(())
                    }
                    AdoptionStatus::Rejected => Ok(()),
                    AdoptionStatus::Accepted | AdoptionStatus::RejectedAdopted => {
                        Err(ShelterError::Conflict(ConflictKind::RequestClosed).into())
                    }
                }
            })
            .await?;

        info!(
            request_id = %request_id,
            moderator_id = %actor.user_id,
            "adoption request rejected"
        );
        Ok(())
    }

    /// One request, visible to staff and to the requester.
    pub async fn get_request(
        &self,
        actor: Option<&Identity>,
        request_id: AdoptionId,
    ) -> Result<AdoptionView, ShelterError> {
        let actor = *authorize(actor, Operation::ViewOwnRequests)?;
        let view = self
            .db
            .call(move |conn| Ok(adoptions::get_request_view(conn, request_id)?))
            .await?
            .ok_or_else(|| ShelterError::not_found("adoption request", request_id))?;

        if view.request.user_id != actor.user_id
            && !permits(actor.role, Operation::ViewPendingRequests)
        {
            return Err(ShelterError::Forbidden {
                operation: Operation::ViewOwnRequests.to_string(),
            });
        }
        Ok(view)
    }

    /// All pending requests, oldest first, for the moderation queue.
    pub async fn pending_requests(
        &self,
        actor: Option<&Identity>,
    ) -> Result<Vec<AdoptionView>, ShelterError> {
        authorize(actor, Operation::ViewPendingRequests)?;
        self.db
            .call(|conn| Ok(adoptions::pending_requests(conn)?))
            .await
    }

    /// The actor's own requests with each animal's current status.
    pub async fn my_requests(
        &self,
        actor: Option<&Identity>,
    ) -> Result<Vec<AdoptionView>, ShelterError> {
        let user_id = authorize(actor, Operation::ViewOwnRequests)?.user_id;
        self.db
            .call(move |conn| Ok(adoptions::requests_for_user(conn, user_id)?))
            .await
    }

    // --- Animals ---

    /// Create an animal with photo metadata for files already uploaded.
    ///
    /// At least one photo is required.
    pub async fn create_animal(
        &self,
        actor: Option<&Identity>,
        animal: NewAnimal,
        new_photos: Vec<NewPhoto>,
    ) -> Result<AnimalId, ShelterError> {
        let actor = authorize(actor, Operation::CreateAnimal)?;
        let animal = validate_animal(animal)?;
        if animal.status == AnimalStatus::Adopted {
            return Err(adopted_is_workflow_only());
        }
        if new_photos.is_empty() {
            return Err(ShelterError::Invalid("at least one photo is required".into()));
        }
        for photo in &new_photos {
            validate_filename(&photo.filename)?;
        }

        let photo_count = new_photos.len();
        let animal_id = self
            .db
            .transaction(move |tx| {
                let id = animals::insert_animal(tx, &animal)?;
                for photo in &new_photos {
                    photos::insert_photo(tx, id, photo)?;
                }
                Ok(id)
            })
            .await?;

        info!(
            animal_id = %animal_id,
            admin_id = %actor.user_id,
            photos = photo_count,
            "animal created"
        );
        Ok(animal_id)
    }

    /// Staff edit of an animal's fields.
    ///
    /// `adopted` cannot be set here. An adopted animal keeps its status
    /// whatever the edit says, so it stays consistent with its accepted request.
    /// Other fields of an adopted animal can still be changed.
    pub async fn edit_animal(
        &self,
        actor: Option<&Identity>,
        animal_id: AnimalId,
        update: AnimalUpdate,
    ) -> Result<(), ShelterError> {
        let actor = authorize(actor, Operation::EditAnimal)?;
        let mut update = validate_animal(update)?;

        self.db
            .transaction(move |tx| {
                let current = animals::get_animal(tx, animal_id)?
                    .ok_or_else(|| ShelterError::not_found("animal", animal_id))?;
                if current.status == AnimalStatus::Adopted {
                    update.status = AnimalStatus::Adopted;
                } else if update.status == AnimalStatus::Adopted {
                    return Err(adopted_is_workflow_only().into());
                }
                animals::update_animal(tx, animal_id, &update)?;
                Ok(())
            })
            .await?;

        info!(animal_id = %animal_id, editor_id = %actor.user_id, "animal updated");
        Ok(())
    }

    /// Delete an animal with its adoption requests, photo rows and photo files.
    ///
    /// The rows are deleted and the files staged inside one transaction. If
    /// any file cannot be staged, staged files are restored and nothing is
    /// deleted. Staged files are purged once the transaction has committed.
    pub async fn delete_animal(
        &self,
        actor: Option<&Identity>,
        animal_id: AnimalId,
    ) -> Result<(), ShelterError> {
        let actor = authorize(actor, Operation::DeleteAnimal)?;
        let store = Arc::clone(&self.photos);

        let (requests, staged) = self
            .db
            .call(move |conn| {
                let tx = begin_immediate(conn)?;
                animals::get_animal(&tx, animal_id)?
                    .ok_or_else(|| ShelterError::not_found("animal", animal_id))?;

                let requests = adoptions::delete_requests_for_animal(&tx, animal_id)?;
                let photo_rows = photos::photos_for_animal(&tx, animal_id)?;
                photos::delete_photos_for_animal(&tx, animal_id)?;
                animals::delete_animal(&tx, animal_id)?;

                let staged = stage_files(store.as_ref(), &photo_rows)?;
                if let Err(e) = tx.commit() {
                    restore_files(store.as_ref(), &staged);
                    return Err(e.into());
                }
                Ok((requests, staged))
            })
            .await
            .inspect_err(|e| {
                if matches!(e, ShelterError::Storage { .. }) {
                    warn!(animal_id = %animal_id, error = %e, "animal deletion rolled back");
                }
            })?;

        for filename in &staged {
            if let Err(e) = self.photos.purge(filename) {
                warn!(filename = %filename, error = %e, "failed to purge staged photo");
            }
        }

        info!(
            animal_id = %animal_id,
            admin_id = %actor.user_id,
            requests,
            photos = staged.len(),
            "animal deleted"
        );
        Ok(())
    }

    /// One animal with its photos and request count.
    pub async fn get_animal(&self, animal_id: AnimalId) -> Result<Option<AnimalDetails>, ShelterError> {
        self.db
            .call(move |conn| {
                let Some(animal) = animals::get_animal(conn, animal_id)? else {
                    return Ok(None);
                };
                Ok(Some(AnimalDetails {
                    adoption_count: animals::adoption_count(conn, animal_id)?,
                    photos: photos::photos_for_animal(conn, animal_id)?,
                    animal,
                }))
            })
            .await
    }

    /// A page of animals, available ones first.
    pub async fn list_animals(&self, query: AnimalQuery) -> Result<Page<AnimalSummary>, ShelterError> {
        let per_page = self.per_page;
        let page = query.page.max(1);
        self.db
            .call(move |conn| {
                let items = animals::list_animals(conn, &query, per_page)?;
                let total = animals::count_animals(conn, query.status)?;
                Ok(Page {
                    items,
                    page,
                    per_page,
                    total,
                })
            })
            .await
    }

    pub async fn search_animals(&self, search: AnimalSearch) -> Result<Vec<AnimalSummary>, ShelterError> {
        self.db
            .call(move |conn| Ok(animals::search_animals(conn, &search)?))
            .await
    }
}

fn adopted_is_workflow_only() -> ShelterError {
    ShelterError::Invalid("status `adopted` is set only by approving an adoption request".into())
}

/// Trim text fields and check required ones.
fn validate_animal(mut animal: NewAnimal) -> Result<NewAnimal, ShelterError> {
    animal.name = animal.name.trim().to_string();
    animal.breed = animal.breed.trim().to_string();
    animal.description = animal.description.trim().to_string();

    if animal.name.is_empty() {
        return Err(ShelterError::Invalid("animal name is required".into()));
    }
    if animal.name.chars().count() > MAX_NAME_LEN {
        return Err(ShelterError::Invalid(format!(
            "animal name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if animal.breed.is_empty() {
        return Err(ShelterError::Invalid("breed is required".into()));
    }
    Ok(animal)
}

/// Stage every photo file. On failure, restore what was staged and return the error.
fn stage_files(
    store: &dyn PhotoStore,
    photos: &[Photo],
) -> Result<Vec<String>, ShelterError> {
    let mut staged = Vec::with_capacity(photos.len());
    for photo in photos {
        match store.stage_removal(&photo.filename) {
            Ok(true) => staged.push(photo.filename.clone()),
            Ok(false) => {}
            Err(e) => {
                restore_files(store, &staged);
                return Err(e);
            }
        }
    }
    Ok(staged)
}

fn restore_files(store: &dyn PhotoStore, staged: &[String]) {
    for filename in staged {
        if let Err(e) = store.restore(filename) {
            warn!(filename = %filename, error = %e, "failed to restore staged photo");
        }
    }
}
