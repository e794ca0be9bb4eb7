// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the adoption workflow.
//!
//! Each test builds an isolated TestHarness with a temp database and upload
//! directory. Tests are independent and order-insensitive.

use shelter_core::types::{AnimalQuery, AnimalSearch, NewAnimal, NewPhoto, SortBy, SortOrder};
use shelter_core::{
    AdoptionStatus, AnimalId, AnimalStatus, ConflictKind, Gender, Role, ShelterError,
};
use shelter_test_utils::{PhotoCall, TestHarness};

fn new_animal(name: &str, status: AnimalStatus) -> NewAnimal {
    NewAnimal {
        name: name.to_string(),
        description: "Calm and house-trained".to_string(),
        age_months: 18,
        breed: "Beagle".to_string(),
        gender: Gender::Male,
        status,
    }
}

// ---- Submitting requests ----

#[tokio::test]
async fn submit_creates_pending_request_and_leaves_animal_status() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();

    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();

    assert_eq!(h.request_status(request).await, AdoptionStatus::Pending);
    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Available));
}

#[tokio::test]
async fn submit_for_adopted_animal_is_unavailable() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Rex", AnimalStatus::Adopted).await.unwrap();

    let err = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::AnimalUnavailable));
    assert_eq!(h.count_rows("adoptions").await, 0);
}

#[tokio::test]
async fn submit_for_unavailable_animal_is_unavailable() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Tom", AnimalStatus::Unavailable).await.unwrap();

    let err = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::AnimalUnavailable));
}

#[tokio::test]
async fn submit_accepts_animal_in_adoption_status() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Luna", AnimalStatus::Adoption).await.unwrap();
    h.workflow
        .submit_request(Some(&h.visitor), animal, "phone 555-0101")
        .await
        .unwrap();
}

#[tokio::test]
async fn second_submit_by_same_user_is_duplicate() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();

    h.workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    let err = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "other@b.com")
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::DuplicateRequest));
    assert_eq!(h.count_rows("adoptions").await, 1);
}

#[tokio::test]
async fn resubmit_after_rejection_is_still_duplicate() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    h.workflow
        .reject_request(Some(&h.moderator), request)
        .await
        .unwrap();

    let err = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::DuplicateRequest));
}

#[tokio::test]
async fn submit_for_missing_animal_is_not_found() {
    let h = TestHarness::new().await.unwrap();
    let err = h
        .workflow
        .submit_request(Some(&h.visitor), AnimalId(404), "a@b.com")
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::NotFound { entity: "animal", .. }));
}

#[tokio::test]
async fn submit_requires_contact_info_and_identity() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();

    let err = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Invalid(_)));

    let err = h
        .workflow
        .submit_request(None, animal, "a@b.com")
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));
    assert_eq!(h.count_rows("adoptions").await, 0);
}

#[tokio::test]
async fn staff_may_submit_requests_too() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    h.workflow
        .submit_request(Some(&h.moderator), animal, "mod@shelter.org")
        .await
        .unwrap();
    h.workflow
        .submit_request(Some(&h.admin), animal, "admin@shelter.org")
        .await
        .unwrap();
    assert_eq!(h.count_rows("adoptions").await, 2);
}

// ---- Approving and rejecting ----

#[tokio::test]
async fn approve_cascades_to_other_pending_requests() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let other = h.add_user("second", Role::User).await.unwrap();

    let r1 = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    let r2 = h
        .workflow
        .submit_request(Some(&other), animal, "c@d.com")
        .await
        .unwrap();

    h.workflow.approve_request(Some(&h.moderator), r1).await.unwrap();

    assert_eq!(h.request_status(r1).await, AdoptionStatus::Accepted);
    assert_eq!(h.request_status(r2).await, AdoptionStatus::RejectedAdopted);
    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Adopted));
    assert_eq!(h.accepted_count(animal).await, 1);
}

#[tokio::test]
async fn approve_leaves_requests_for_other_animals_alone() {
    let h = TestHarness::new().await.unwrap();
    let a = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let b = h.add_animal("Murka", AnimalStatus::Available).await.unwrap();
    let other = h.add_user("second", Role::User).await.unwrap();

    let ra = h
        .workflow
        .submit_request(Some(&h.visitor), a, "a@b.com")
        .await
        .unwrap();
    let rb = h
        .workflow
        .submit_request(Some(&other), b, "c@d.com")
        .await
        .unwrap();

    h.workflow.approve_request(Some(&h.admin), ra).await.unwrap();

    assert_eq!(h.request_status(rb).await, AdoptionStatus::Pending);
    assert_eq!(h.animal_status(b).await, Some(AnimalStatus::Available));
}

#[tokio::test]
async fn approving_twice_is_idempotent() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();

    h.workflow.approve_request(Some(&h.moderator), request).await.unwrap();
    h.workflow.approve_request(Some(&h.moderator), request).await.unwrap();

    assert_eq!(h.request_status(request).await, AdoptionStatus::Accepted);
    assert_eq!(h.accepted_count(animal).await, 1);
}

#[tokio::test]
async fn auto_rejected_request_cannot_be_approved() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let other = h.add_user("second", Role::User).await.unwrap();
    let r1 = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    let r2 = h
        .workflow
        .submit_request(Some(&other), animal, "c@d.com")
        .await
        .unwrap();
    h.workflow.approve_request(Some(&h.moderator), r1).await.unwrap();

    let err = h
        .workflow
        .approve_request(Some(&h.moderator), r2)
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::RequestClosed));
    assert_eq!(h.request_status(r1).await, AdoptionStatus::Accepted);
    assert_eq!(h.accepted_count(animal).await, 1);
}

#[tokio::test]
async fn concurrent_approvals_admit_exactly_one_winner() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let other = h.add_user("second", Role::User).await.unwrap();
    let r1 = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    let r2 = h
        .workflow
        .submit_request(Some(&other), animal, "c@d.com")
        .await
        .unwrap();

    let (w1, w2) = (h.workflow.clone(), h.workflow.clone());
    let (admin, moderator) = (h.admin, h.moderator);
    let first = tokio::spawn(async move { w1.approve_request(Some(&admin), r1).await });
    let second = tokio::spawn(async move { w2.approve_request(Some(&moderator), r2).await });
    let results = [first.await.unwrap(), second.await.unwrap()];

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert!(loser.is_conflict(ConflictKind::RequestClosed));

    assert_eq!(h.accepted_count(animal).await, 1);
    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Adopted));
    let statuses = [h.request_status(r1).await, h.request_status(r2).await];
    assert!(statuses.contains(&AdoptionStatus::Accepted));
    assert!(statuses.contains(&AdoptionStatus::RejectedAdopted));
}

#[tokio::test]
async fn approvals_over_separate_connections_admit_exactly_one_winner() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let other = h.add_user("second", Role::User).await.unwrap();
    let r1 = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    let r2 = h
        .workflow
        .submit_request(Some(&other), animal, "c@d.com")
        .await
        .unwrap();

    let w1 = h.workflow.clone();
    let w2 = h.second_workflow().await.unwrap();
    let (admin, moderator) = (h.admin, h.moderator);
    let first = tokio::spawn(async move { w1.approve_request(Some(&admin), r1).await });
    let second = tokio::spawn(async move { w2.approve_request(Some(&moderator), r2).await });
    let results = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert!(loser.is_conflict(ConflictKind::RequestClosed), "got {loser:?}");
    assert_eq!(h.accepted_count(animal).await, 1);
    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Adopted));
}

#[tokio::test]
async fn reject_only_touches_the_target_request() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let other = h.add_user("second", Role::User).await.unwrap();
    let r1 = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    let r2 = h
        .workflow
        .submit_request(Some(&other), animal, "c@d.com")
        .await
        .unwrap();

    h.workflow.reject_request(Some(&h.moderator), r1).await.unwrap();

    assert_eq!(h.request_status(r1).await, AdoptionStatus::Rejected);
    assert_eq!(h.request_status(r2).await, AdoptionStatus::Pending);
    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Available));

    // Rejecting again is a no-op.
    h.workflow.reject_request(Some(&h.moderator), r1).await.unwrap();
    let err = h
        .workflow
        .approve_request(Some(&h.moderator), r1)
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::RequestClosed));
}

#[tokio::test]
async fn accepted_request_cannot_be_rejected() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    h.workflow.approve_request(Some(&h.admin), request).await.unwrap();

    let err = h
        .workflow
        .reject_request(Some(&h.admin), request)
        .await
        .unwrap_err();
    assert!(err.is_conflict(ConflictKind::RequestClosed));
    assert_eq!(h.request_status(request).await, AdoptionStatus::Accepted);
}

#[tokio::test]
async fn users_cannot_moderate() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();

    let err = h
        .workflow
        .approve_request(Some(&h.visitor), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));
    let err = h
        .workflow
        .reject_request(None, request)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));

    assert_eq!(h.request_status(request).await, AdoptionStatus::Pending);
    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Available));
}

#[tokio::test]
async fn moderating_missing_request_is_not_found() {
    let h = TestHarness::new().await.unwrap();
    let err = h
        .workflow
        .approve_request(Some(&h.admin), shelter_core::AdoptionId(99))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::NotFound { .. }));
}

// ---- Request views ----

#[tokio::test]
async fn pending_queue_and_own_requests() {
    let h = TestHarness::new().await.unwrap();
    let a = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let b = h.add_animal("Murka", AnimalStatus::Available).await.unwrap();
    let other = h.add_user("second", Role::User).await.unwrap();

    let ra = h
        .workflow
        .submit_request(Some(&h.visitor), a, "a@b.com")
        .await
        .unwrap();
    h.workflow
        .submit_request(Some(&other), b, "c@d.com")
        .await
        .unwrap();
    h.workflow.approve_request(Some(&h.moderator), ra).await.unwrap();

    let pending = h.workflow.pending_requests(Some(&h.moderator)).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].animal_name, "Murka");
    assert_eq!(pending[0].username, "second");

    let mine = h.workflow.my_requests(Some(&h.visitor)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].request.status, AdoptionStatus::Accepted);
    assert_eq!(mine[0].animal_status, AnimalStatus::Adopted);

    let err = h.workflow.pending_requests(Some(&h.visitor)).await.unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));
}

#[tokio::test]
async fn request_detail_is_private_to_owner_and_staff() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let stranger = h.add_user("stranger", Role::User).await.unwrap();
    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();

    let own = h.workflow.get_request(Some(&h.visitor), request).await.unwrap();
    assert_eq!(own.request.contact_info, "a@b.com");
    h.workflow.get_request(Some(&h.moderator), request).await.unwrap();

    let err = h
        .workflow
        .get_request(Some(&stranger), request)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));
}

// ---- Animal management ----

#[tokio::test]
async fn create_and_read_animal_with_photos() {
    let h = TestHarness::new().await.unwrap();
    let photos = vec![NewPhoto {
        filename: "barsik_1.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
    }];
    let id = h
        .workflow
        .create_animal(Some(&h.admin), new_animal("Barsik", AnimalStatus::Available), photos)
        .await
        .unwrap();

    let details = h.workflow.get_animal(id).await.unwrap().unwrap();
    assert_eq!(details.animal.name, "Barsik");
    assert_eq!(details.photos.len(), 1);
    assert_eq!(details.adoption_count, 0);
    assert!(h.workflow.get_animal(AnimalId(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn create_animal_is_admin_only_and_validated() {
    let h = TestHarness::new().await.unwrap();

    let err = h
        .workflow
        .create_animal(
            Some(&h.moderator),
            new_animal("Barsik", AnimalStatus::Available),
            vec![],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));

    let err = h
        .workflow
        .create_animal(Some(&h.admin), new_animal("Barsik", AnimalStatus::Adopted), vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Invalid(_)));

    let err = h
        .workflow
        .create_animal(
            Some(&h.admin),
            new_animal("Barsik", AnimalStatus::Available),
            vec![],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Invalid(ref msg) if msg.contains("photo")));

    let bad_photo = vec![NewPhoto {
        filename: "../escape.jpg".to_string(),
        mime_type: "image/jpeg".to_string(),
    }];
    let err = h
        .workflow
        .create_animal(
            Some(&h.admin),
            new_animal("Barsik", AnimalStatus::Available),
            bad_photo,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Invalid(_)));
    assert_eq!(h.count_rows("animals").await, 0);
}

#[tokio::test]
async fn edit_keeps_adopted_status() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();
    h.workflow.approve_request(Some(&h.admin), request).await.unwrap();

    h.workflow
        .edit_animal(
            Some(&h.moderator),
            animal,
            new_animal("Barsik II", AnimalStatus::Available),
        )
        .await
        .unwrap();

    let details = h.workflow.get_animal(animal).await.unwrap().unwrap();
    assert_eq!(details.animal.name, "Barsik II");
    assert_eq!(details.animal.status, AnimalStatus::Adopted);
}

#[tokio::test]
async fn edit_changes_status_and_rejects_adopted() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();

    h.workflow
        .edit_animal(
            Some(&h.moderator),
            animal,
            new_animal("Barsik", AnimalStatus::Unavailable),
        )
        .await
        .unwrap();
    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Unavailable));

    let err = h
        .workflow
        .edit_animal(Some(&h.admin), animal, new_animal("Barsik", AnimalStatus::Adopted))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Invalid(_)));

    let err = h
        .workflow
        .edit_animal(
            Some(&h.visitor),
            animal,
            new_animal("Hacked", AnimalStatus::Available),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));

    let err = h
        .workflow
        .edit_animal(
            Some(&h.admin),
            AnimalId(404),
            new_animal("Ghost", AnimalStatus::Available),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::NotFound { .. }));
}

#[tokio::test]
async fn listing_puts_available_first_and_paginates() {
    let h = TestHarness::builder().with_per_page(2).build().await.unwrap();
    h.add_animal("Adopted One", AnimalStatus::Adopted).await.unwrap();
    h.add_animal("Bella", AnimalStatus::Available).await.unwrap();
    h.add_animal("Charlie", AnimalStatus::Available).await.unwrap();

    let query = AnimalQuery {
        sort_by: SortBy::Name,
        sort_order: SortOrder::Asc,
        ..AnimalQuery::default()
    };
    let page = h.workflow.list_animals(query.clone()).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages(), 2);
    let names: Vec<_> = page.items.iter().map(|s| s.animal.name.as_str()).collect();
    assert_eq!(names, ["Bella", "Charlie"]);

    let page = h
        .workflow
        .list_animals(AnimalQuery { page: 2, ..query })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].animal.name, "Adopted One");
}

#[tokio::test]
async fn search_matches_name_and_filters() {
    let h = TestHarness::new().await.unwrap();
    h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    h.add_animal("Murka", AnimalStatus::Unavailable).await.unwrap();

    let found = h
        .workflow
        .search_animals(AnimalSearch {
            text: Some("bars".to_string()),
            ..AnimalSearch::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].animal.name, "Barsik");

    let found = h
        .workflow
        .search_animals(AnimalSearch {
            status: Some(AnimalStatus::Unavailable),
            ..AnimalSearch::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].animal.name, "Murka");
}

// ---- Deleting animals ----

#[tokio::test]
async fn delete_removes_requests_photos_and_files() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    h.add_photo(animal, "barsik_1.jpg").await.unwrap();
    h.add_photo(animal, "barsik_2.jpg").await.unwrap();
    h.workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();

    h.workflow.delete_animal(Some(&h.admin), animal).await.unwrap();

    assert_eq!(h.animal_status(animal).await, None);
    assert_eq!(h.count_rows("adoptions").await, 0);
    assert_eq!(h.count_rows("animal_photos").await, 0);
    assert!(!h.photo_path("barsik_1.jpg").exists());
    assert!(!h.photo_path("barsik_2.jpg").exists());
}

#[tokio::test]
async fn delete_tolerates_already_missing_files() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    h.add_photo(animal, "barsik_1.jpg").await.unwrap();
    std::fs::remove_file(h.photo_path("barsik_1.jpg")).unwrap();

    h.workflow.delete_animal(Some(&h.admin), animal).await.unwrap();
    assert_eq!(h.count_rows("animal_photos").await, 0);
}

#[tokio::test]
async fn failed_file_removal_rolls_back_everything() {
    let h = TestHarness::builder()
        .with_failing_photos()
        .build()
        .await
        .unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    h.add_photo(animal, "barsik_1.jpg").await.unwrap();
    h.add_photo(animal, "barsik_2.jpg").await.unwrap();
    let request = h
        .workflow
        .submit_request(Some(&h.visitor), animal, "a@b.com")
        .await
        .unwrap();

    let store = h.failing_photos.as_ref().unwrap();
    store.fail_on("barsik_2.jpg");

    let err = h
        .workflow
        .delete_animal(Some(&h.admin), animal)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Storage { .. }));

    assert_eq!(h.animal_status(animal).await, Some(AnimalStatus::Available));
    assert_eq!(h.request_status(request).await, AdoptionStatus::Pending);
    assert_eq!(h.count_rows("animal_photos").await, 2);
    assert!(h.photo_path("barsik_1.jpg").exists());
    assert!(h.photo_path("barsik_2.jpg").exists());
    assert!(store.calls().contains(&PhotoCall::Restore("barsik_1.jpg".into())));

    store.clear_failures();
    h.workflow.delete_animal(Some(&h.admin), animal).await.unwrap();
    assert!(!h.photo_path("barsik_1.jpg").exists());
}

#[tokio::test]
async fn delete_is_admin_only() {
    let h = TestHarness::new().await.unwrap();
    let animal = h.add_animal("Barsik", AnimalStatus::Available).await.unwrap();
    h.add_photo(animal, "barsik_1.jpg").await.unwrap();

    let err = h
        .workflow
        .delete_animal(Some(&h.moderator), animal)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));
    assert!(h.photo_path("barsik_1.jpg").exists());

    let err = h
        .workflow
        .delete_animal(Some(&h.admin), AnimalId(404))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::NotFound { .. }));
}

// ---- Users ----

fn new_user(username: &str, role: Role) -> shelter_core::types::NewUser {
    shelter_core::types::NewUser {
        username: username.to_string(),
        first_name: "Olga".to_string(),
        last_name: "Ivanova".to_string(),
        middle_name: None,
        role,
    }
}

#[tokio::test]
async fn first_user_bootstraps_as_admin() {
    let dir = tempfile::tempdir().unwrap();
    let db = shelter_storage::Database::open(dir.path().join("boot.db").to_str().unwrap())
        .await
        .unwrap();
    let store = shelter_workflow::FsPhotoStore::open(dir.path().join("uploads")).unwrap();
    let workflow = shelter_workflow::AdoptionWorkflow::new(db, std::sync::Arc::new(store));

    let err = workflow
        .register_user(None, new_user("olga", Role::User))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Invalid(_)));

    let admin = workflow
        .register_user(None, new_user("olga", Role::Admin))
        .await
        .unwrap();
    assert_eq!(admin.role, Role::Admin);

    let err = workflow
        .register_user(None, new_user("ivan", Role::User))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));

    workflow
        .register_user(Some(&admin), new_user("ivan", Role::User))
        .await
        .unwrap();
    assert_eq!(workflow.identity_for("ivan").await.unwrap().role, Role::User);
}

#[tokio::test]
async fn only_admins_register_users() {
    let h = TestHarness::new().await.unwrap();

    let err = h
        .workflow
        .register_user(Some(&h.moderator), new_user("newbie", Role::User))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Forbidden { .. }));

    h.workflow
        .register_user(Some(&h.admin), new_user("newbie", Role::User))
        .await
        .unwrap();
    let err = h
        .workflow
        .register_user(Some(&h.admin), new_user("newbie", Role::User))
        .await
        .unwrap_err();
    assert!(matches!(err, ShelterError::Invalid(_)));

    let err = h.workflow.identity_for("nobody").await.unwrap_err();
    assert!(matches!(err, ShelterError::NotFound { entity: "user", .. }));
}
