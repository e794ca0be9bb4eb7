// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adoption Store: rows of `adoptions` and the joined views moderators use.
//!
//! These functions perform single statements only. The rules tying request
//! status to animal status live in the workflow engine, which calls them
//! inside one transaction.

use rusqlite::{params, Connection, OptionalExtension};
use shelter_core::types::{AdoptionRequest, AdoptionView};
use shelter_core::{AdoptionId, AdoptionStatus, AnimalId, UserId};

use super::parse_column;

const REQUEST_COLUMNS: &str =
    "ad.id, ad.animal_id, ad.user_id, ad.contact_info, ad.status, ad.created_at";

const VIEW_FROM: &str = "FROM adoptions ad
     JOIN users u ON u.id = ad.user_id
     JOIN animals an ON an.id = ad.animal_id";

fn request_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AdoptionRequest> {
    Ok(AdoptionRequest {
        id: AdoptionId(row.get(0)?),
        animal_id: AnimalId(row.get(1)?),
        user_id: UserId(row.get(2)?),
        contact_info: row.get(3)?,
        status: parse_column(row, 4)?,
        created_at: row.get(5)?,
    })
}

fn view_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AdoptionView> {
    Ok(AdoptionView {
        request: request_from_row(row)?,
        username: row.get(6)?,
        animal_name: row.get(7)?,
        animal_status: parse_column(row, 8)?,
    })
}

fn query_views(
    conn: &Connection,
    filter: &str,
    param: impl rusqlite::ToSql,
) -> rusqlite::Result<Vec<AdoptionView>> {
    let sql = format!(
        "SELECT {REQUEST_COLUMNS}, u.username, an.name, an.status
         {VIEW_FROM}
         WHERE {filter}
         ORDER BY ad.created_at ASC, ad.id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![param], view_from_row)?;
    rows.collect()
}

/// Insert a new `pending` request. Returns its id.
pub fn insert_request(
    conn: &Connection,
    animal_id: AnimalId,
    user_id: UserId,
    contact_info: &str,
) -> rusqlite::Result<AdoptionId> {
    conn.execute(
        "INSERT INTO adoptions (animal_id, user_id, contact_info, status)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            animal_id.0,
            user_id.0,
            contact_info,
            AdoptionStatus::Pending.to_string(),
        ],
    )?;
    Ok(AdoptionId(conn.last_insert_rowid()))
}

pub fn get_request(conn: &Connection, id: AdoptionId) -> rusqlite::Result<Option<AdoptionRequest>> {
    conn.query_row(
        &format!("SELECT {REQUEST_COLUMNS} FROM adoptions ad WHERE ad.id = ?1"),
        params![id.0],
        request_from_row,
    )
    .optional()
}

/// The request `user_id` made for `animal_id`, in any status.
pub fn find_request(
    conn: &Connection,
    animal_id: AnimalId,
    user_id: UserId,
) -> rusqlite::Result<Option<AdoptionRequest>> {
    conn.query_row(
        &format!(
            "SELECT {REQUEST_COLUMNS} FROM adoptions ad
             WHERE ad.animal_id = ?1 AND ad.user_id = ?2"
        ),
        params![animal_id.0, user_id.0],
        request_from_row,
    )
    .optional()
}

pub fn set_request_status(
    conn: &Connection,
    id: AdoptionId,
    status: AdoptionStatus,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE adoptions SET status = ?1 WHERE id = ?2",
        params![status.to_string(), id.0],
    )
}

/// Mark every other pending request for the animal as `rejected_adopted`.
/// Returns how many were changed.
pub fn reject_pending_siblings(
    conn: &Connection,
    animal_id: AnimalId,
    accepted: AdoptionId,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE adoptions SET status = ?1
         WHERE animal_id = ?2 AND id != ?3 AND status = ?4",
        params![
            AdoptionStatus::RejectedAdopted.to_string(),
            animal_id.0,
            accepted.0,
            AdoptionStatus::Pending.to_string(),
        ],
    )
}

/// All requests for an animal, oldest first.
pub fn requests_for_animal(
    conn: &Connection,
    animal_id: AnimalId,
) -> rusqlite::Result<Vec<AdoptionRequest>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REQUEST_COLUMNS} FROM adoptions ad
         WHERE ad.animal_id = ?1 ORDER BY ad.id ASC"
    ))?;
    let rows = stmt.query_map(params![animal_id.0], request_from_row)?;
    rows.collect()
}

pub fn delete_requests_for_animal(conn: &Connection, animal_id: AnimalId) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM adoptions WHERE animal_id = ?1",
        params![animal_id.0],
    )
}

/// Pending requests across all animals, oldest first.
pub fn pending_requests(conn: &Connection) -> rusqlite::Result<Vec<AdoptionView>> {
    query_views(
        conn,
        "ad.status = ?1",
        AdoptionStatus::Pending.to_string(),
    )
}

/// Every request a user has made, with the animal's current status.
pub fn requests_for_user(conn: &Connection, user_id: UserId) -> rusqlite::Result<Vec<AdoptionView>> {
    query_views(conn, "ad.user_id = ?1", user_id.0)
}

pub fn get_request_view(conn: &Connection, id: AdoptionId) -> rusqlite::Result<Option<AdoptionView>> {
    Ok(query_views(conn, "ad.id = ?1", id.0)?.into_iter().next())
}
