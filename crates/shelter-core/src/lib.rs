// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the shelter adoption workflow.
//!
//! Provides the error taxonomy, typed entity records, status and role
//! enums, and the trait seams used by the storage and workflow crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ConflictKind, ShelterError};
pub use traits::PhotoStore;
pub use types::{
    AdoptionId, AdoptionStatus, AnimalId, AnimalStatus, Gender, Identity, Role, UserId,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use types::{Page, SortBy};

    #[test]
    fn animal_status_round_trips_through_strings() {
        for status in [
            AnimalStatus::Available,
            AnimalStatus::Adoption,
            AnimalStatus::Adopted,
            AnimalStatus::Unavailable,
        ] {
            let s = status.to_string();
            assert_eq!(AnimalStatus::from_str(&s).unwrap(), status);
        }
        assert_eq!(AnimalStatus::Available.to_string(), "available");
    }

    #[test]
    fn adoption_status_uses_snake_case() {
        assert_eq!(AdoptionStatus::RejectedAdopted.to_string(), "rejected_adopted");
        assert_eq!(
            AdoptionStatus::from_str("rejected_adopted").unwrap(),
            AdoptionStatus::RejectedAdopted
        );
        assert!(AdoptionStatus::from_str("approved").is_err());
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!AdoptionStatus::Pending.is_terminal());
        assert!(AdoptionStatus::Accepted.is_terminal());
        assert!(AdoptionStatus::Rejected.is_terminal());
        assert!(AdoptionStatus::RejectedAdopted.is_terminal());
    }

    #[test]
    fn adoptable_statuses() {
        assert!(AnimalStatus::Available.is_adoptable());
        assert!(AnimalStatus::Adoption.is_adoptable());
        assert!(!AnimalStatus::Adopted.is_adoptable());
        assert!(!AnimalStatus::Unavailable.is_adoptable());
    }

    #[test]
    fn role_serialization() {
        let json = serde_json::to_string(&Role::Moderator).unwrap();
        assert_eq!(json, "\"moderator\"");
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Moderator);
        assert_eq!(SortBy::from_str("age_months").unwrap(), SortBy::AgeMonths);
    }

    #[test]
    fn notices_distinguish_conflicts() {
        let unavailable = ShelterError::Conflict(ConflictKind::AnimalUnavailable);
        let duplicate = ShelterError::Conflict(ConflictKind::DuplicateRequest);
        assert_ne!(unavailable.notice(), duplicate.notice());
        assert!(duplicate.is_conflict(ConflictKind::DuplicateRequest));
        assert!(!duplicate.is_conflict(ConflictKind::AnimalUnavailable));

        let storage = ShelterError::storage(std::io::Error::other("disk"));
        assert!(!storage.notice().contains("disk"));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = |total| Page::<()> {
            items: Vec::new(),
            page: 1,
            per_page: 9,
            total,
        };
        assert_eq!(page(0).total_pages(), 0);
        assert_eq!(page(9).total_pages(), 1);
        assert_eq!(page(10).total_pages(), 2);
        assert_eq!(page(27).total_pages(), 3);
    }

    proptest::proptest! {
        #[test]
        fn total_pages_covers_every_item(total in 0i64..10_000, per_page in 1u32..100) {
            let page = Page::<()> { items: Vec::new(), page: 1, per_page, total };
            let pages = i64::from(page.total_pages());
            proptest::prop_assert!(pages * i64::from(per_page) >= total);
            proptest::prop_assert!((pages - 1).max(0) * i64::from(per_page) < total.max(1));
        }
    }
}
