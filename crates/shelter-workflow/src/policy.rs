// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access policy: which roles may run which workflow operation.
//!
//! The table in [`allowed_roles`] is the only place roles are compared.
//! Anonymous callers are denied everything that requires a role
//! (fail-closed).

use shelter_core::{Identity, Role, ShelterError};
use strum::{Display, EnumIter};
use tracing::debug;

/// Operations guarded by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    SubmitRequest,
    ViewOwnRequests,
    ApproveRequest,
    RejectRequest,
    ViewPendingRequests,
    CreateAnimal,
    EditAnimal,
    DeleteAnimal,
    ManageUsers,
}

const ANY_ROLE: &[Role] = &[Role::Admin, Role::Moderator, Role::User];
const STAFF: &[Role] = &[Role::Admin, Role::Moderator];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Roles permitted to run `operation`.
pub fn allowed_roles(operation: Operation) -> &'static [Role] {
    match operation {
        Operation::SubmitRequest | Operation::ViewOwnRequests => ANY_ROLE,
        Operation::ApproveRequest
        | Operation::RejectRequest
        | Operation::ViewPendingRequests
        | Operation::EditAnimal => STAFF,
        Operation::CreateAnimal | Operation::DeleteAnimal | Operation::ManageUsers => ADMIN_ONLY,
    }
}

pub fn permits(role: Role, operation: Operation) -> bool {
    allowed_roles(operation).contains(&role)
}

/// Check `identity` against the table. Returns the identity on success.
pub fn authorize(identity: Option<&Identity>, operation: Operation) -> Result<&Identity, ShelterError> {
    match identity {
        Some(identity) if permits(identity.role, operation) => Ok(identity),
        _ => {
            debug!(
                %operation,
                role = ?identity.map(|i| i.role),
                "operation denied by access policy"
            );
            Err(ShelterError::Forbidden {
                operation: operation.to_string(),
            })
        }
    }
}
