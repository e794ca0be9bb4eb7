// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Animal Store: CRUD, listing, and search over `animals`.
//!
//! `status` is written here only through [`set_animal_status`] (used by the
//! workflow) and through staff edits, which the workflow validates first.

use rusqlite::{params, Connection, OptionalExtension};
use shelter_core::types::{
    Animal, AnimalQuery, AnimalSearch, AnimalSummary, NewAnimal, SortBy, SortOrder,
};
use shelter_core::{AnimalId, AnimalStatus};

use super::parse_column;

const ANIMAL_COLUMNS: &str =
    "a.id, a.name, a.description, a.age_months, a.breed, a.gender, a.status, a.created_at";

/// Summary columns appended after [`ANIMAL_COLUMNS`].
const SUMMARY_COLUMNS: &str = "
    (SELECT filename FROM animal_photos WHERE animal_id = a.id ORDER BY id LIMIT 1),
    (SELECT COUNT(*) FROM adoptions WHERE animal_id = a.id)";

fn animal_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Animal> {
    Ok(Animal {
        id: AnimalId(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        age_months: row.get(3)?,
        breed: row.get(4)?,
        gender: parse_column(row, 5)?,
        status: parse_column(row, 6)?,
        created_at: row.get(7)?,
    })
}

fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnimalSummary> {
    Ok(AnimalSummary {
        animal: animal_from_row(row)?,
        photo_filename: row.get(8)?,
        adoption_count: row.get(9)?,
    })
}

/// Insert an animal. Returns the new id.
pub fn insert_animal(conn: &Connection, animal: &NewAnimal) -> rusqlite::Result<AnimalId> {
    conn.execute(
        "INSERT INTO animals (name, description, age_months, breed, gender, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            animal.name,
            animal.description,
            animal.age_months,
            animal.breed,
            animal.gender.to_string(),
            animal.status.to_string(),
        ],
    )?;
    Ok(AnimalId(conn.last_insert_rowid()))
}

pub fn get_animal(conn: &Connection, id: AnimalId) -> rusqlite::Result<Option<Animal>> {
    conn.query_row(
        &format!("SELECT {ANIMAL_COLUMNS} FROM animals a WHERE a.id = ?1"),
        params![id.0],
        animal_from_row,
    )
    .optional()
}

/// Overwrite the editable fields of an animal. Returns the number of rows changed.
pub fn update_animal(conn: &Connection, id: AnimalId, animal: &NewAnimal) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE animals
         SET name = ?1, description = ?2, age_months = ?3, breed = ?4, gender = ?5, status = ?6
         WHERE id = ?7",
        params![
            animal.name,
            animal.description,
            animal.age_months,
            animal.breed,
            animal.gender.to_string(),
            animal.status.to_string(),
            id.0,
        ],
    )
}

pub fn set_animal_status(
    conn: &Connection,
    id: AnimalId,
    status: AnimalStatus,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE animals SET status = ?1 WHERE id = ?2",
        params![status.to_string(), id.0],
    )
}

pub fn delete_animal(conn: &Connection, id: AnimalId) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM animals WHERE id = ?1", params![id.0])
}

/// Number of adoption requests, in any status, for the animal.
pub fn adoption_count(conn: &Connection, id: AnimalId) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM adoptions WHERE animal_id = ?1",
        params![id.0],
        |row| row.get(0),
    )
}

fn order_clause(sort_by: SortBy, order: SortOrder) -> String {
    let column = match sort_by {
        SortBy::CreatedAt => "a.created_at",
        SortBy::Name => "a.name",
        SortBy::AgeMonths => "a.age_months",
    };
    let direction = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    // Available animals always come first.
    format!("ORDER BY a.status = 'available' DESC, {column} {direction}, a.id {direction}")
}

/// One page of animals. `query.page` is 1-based; page 0 is treated as 1.
pub fn list_animals(
    conn: &Connection,
    query: &AnimalQuery,
    per_page: u32,
) -> rusqlite::Result<Vec<AnimalSummary>> {
    let offset = i64::from(query.page.max(1) - 1) * i64::from(per_page);
    let sql = format!(
        "SELECT {ANIMAL_COLUMNS}, {SUMMARY_COLUMNS}
         FROM animals a
         WHERE (?1 IS NULL OR a.status = ?1)
         {}
         LIMIT ?2 OFFSET ?3",
        order_clause(query.sort_by, query.sort_order)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![query.status.map(|s| s.to_string()), per_page, offset],
        summary_from_row,
    )?;
    rows.collect()
}

pub fn count_animals(conn: &Connection, status: Option<AnimalStatus>) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM animals WHERE (?1 IS NULL OR status = ?1)",
        params![status.map(|s| s.to_string())],
        |row| row.get(0),
    )
}

/// Filter animals by a name/breed substring and exact attributes.
pub fn search_animals(
    conn: &Connection,
    search: &AnimalSearch,
) -> rusqlite::Result<Vec<AnimalSummary>> {
    let pattern = search
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("%{t}%"));
    let sql = format!(
        "SELECT {ANIMAL_COLUMNS}, {SUMMARY_COLUMNS}
         FROM animals a
         WHERE (?1 IS NULL OR a.name LIKE ?1 OR a.breed LIKE ?1)
           AND (?2 IS NULL OR a.status = ?2)
           AND (?3 IS NULL OR a.gender = ?3)
           AND (?4 IS NULL OR a.breed = ?4)
         ORDER BY a.name ASC, a.id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![
            pattern,
            search.status.map(|s| s.to_string()),
            search.gender.map(|g| g.to_string()),
            search.breed,
        ],
        summary_from_row,
    )?;
    rows.collect()
}
