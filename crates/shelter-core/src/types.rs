// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity and value types shared by storage and the workflow engine.
//!
//! Status enums persist as their lowercase snake_case names, which is also
//! the form used in configuration and on the command line.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Row id of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimalId(pub i64);

/// Row id of an adoption request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdoptionId(pub i64);

/// Row id of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_id!(AnimalId, AdoptionId, UserId);

/// Availability of an animal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnimalStatus {
    Available,
    /// Interest has been expressed; still open for requests.
    Adoption,
    /// Set only when an adoption request is accepted.
    Adopted,
    /// Administrative hold (quarantine, treatment).
    Unavailable,
}

impl AnimalStatus {
    /// Whether new adoption requests may be submitted.
    pub fn is_adoptable(self) -> bool {
        matches!(self, Self::Available | Self::Adoption)
    }
}

/// Lifecycle status of an adoption request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
    Pending,
    Accepted,
    Rejected,
    /// Auto-rejected because another request for the same animal was accepted.
    RejectedAdopted,
}

impl AdoptionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Role of an authenticated identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Moderator,
    User,
}

/// The authenticated caller, as resolved by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// A persisted animal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub name: String,
    pub description: String,
    pub age_months: u32,
    pub breed: String,
    pub gender: Gender,
    pub status: AnimalStatus,
    pub created_at: String,
}

/// Fields for a new animal. `status` may not be [`AnimalStatus::Adopted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnimal {
    pub name: String,
    pub description: String,
    pub age_months: u32,
    pub breed: String,
    pub gender: Gender,
    pub status: AnimalStatus,
}

/// Staff edit of an existing animal.
pub type AnimalUpdate = NewAnimal;

/// Listing row with the first photo and the number of requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalSummary {
    pub animal: Animal,
    pub photo_filename: Option<String>,
    pub adoption_count: i64,
}

/// Full view of one animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalDetails {
    pub animal: Animal,
    pub adoption_count: i64,
    pub photos: Vec<Photo>,
}

/// A persisted adoption request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionRequest {
    pub id: AdoptionId,
    pub animal_id: AnimalId,
    pub user_id: UserId,
    pub contact_info: String,
    pub status: AdoptionStatus,
    pub created_at: String,
}

/// A request joined with the names a moderator or requester needs to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionView {
    pub request: AdoptionRequest,
    pub username: String,
    pub animal_name: String,
    pub animal_status: AnimalStatus,
}

/// Photo metadata. The bytes live in a [`crate::PhotoStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub animal_id: AnimalId,
    pub filename: String,
    pub mime_type: String,
}

/// Photo metadata for a file the upload layer has already stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhoto {
    pub filename: String,
    pub mime_type: String,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub role: Role,
    pub created_at: String,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.role)
    }
}

/// Fields for registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub role: Role,
}

/// Sortable listing columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    CreatedAt,
    Name,
    AgeMonths,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Listing parameters. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalQuery {
    pub page: u32,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub status: Option<AnimalStatus>,
}

impl Default for AnimalQuery {
    fn default() -> Self {
        Self {
            page: 1,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            status: None,
        }
    }
}

/// Free-text and attribute filters for animal search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalSearch {
    /// Substring matched against name and breed.
    pub text: Option<String>,
    pub status: Option<AnimalStatus>,
    pub gender: Option<Gender>,
    pub breed: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl<T> Page<T> {
    /// Number of pages, rounding up. Zero when there are no items.
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        let per_page = i64::from(self.per_page);
        ((self.total + per_page - 1) / per_page) as u32
    }
}
