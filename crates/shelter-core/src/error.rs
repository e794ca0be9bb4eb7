// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the shelter adoption workflow.

use thiserror::Error;

/// Business-rule violations reported as [`ShelterError::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// The animal is not in an adoptable status.
    AnimalUnavailable,
    /// The requester already has a request for this animal, in any status.
    DuplicateRequest,
    /// The request is in a terminal status that does not allow the transition.
    RequestClosed,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnimalUnavailable => f.write_str("animal is not available for adoption"),
            Self::DuplicateRequest => f.write_str("an adoption request already exists"),
            Self::RequestClosed => f.write_str("adoption request is already closed"),
        }
    }
}

/// The primary error type returned by storage and workflow operations.
#[derive(Debug, Error)]
pub enum ShelterError {
    /// A referenced animal, request, or user does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A business rule rejected the operation.
    #[error("conflict: {0}")]
    Conflict(ConflictKind),

    /// The caller's role does not permit the operation.
    #[error("forbidden: {operation} requires a different role")]
    Forbidden { operation: String },

    /// Database or file-system failure. Multi-step operations are rolled back.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Input rejected before reaching the store.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShelterError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// The notice a presentation layer shows for this error.
    ///
    /// Storage and internal failures collapse into one generic message so
    /// that database details never reach visitors.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "The requested record was not found.",
            Self::Conflict(ConflictKind::AnimalUnavailable) => {
                "This animal is currently unavailable for adoption."
            }
            Self::Conflict(ConflictKind::DuplicateRequest) => {
                "You have already submitted a request for this animal."
            }
            Self::Conflict(ConflictKind::RequestClosed) => {
                "This adoption request has already been processed."
            }
            Self::Forbidden { .. } => "You do not have sufficient rights to perform this action.",
            Self::Invalid(_) => "Please check the entered data and try again.",
            Self::Storage { .. } | Self::Config(_) | Self::Internal(_) => {
                "An error occurred while processing your request."
            }
        }
    }

    /// Whether this error is a conflict of the given kind.
    pub fn is_conflict(&self, kind: ConflictKind) -> bool {
        matches!(self, Self::Conflict(k) if *k == kind)
    }
}
