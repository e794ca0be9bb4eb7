// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Photo metadata rows. File bytes are handled by a `PhotoStore`.

use rusqlite::{params, Connection};
use shelter_core::types::{NewPhoto, Photo};
use shelter_core::AnimalId;

pub fn insert_photo(conn: &Connection, animal_id: AnimalId, photo: &NewPhoto) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO animal_photos (animal_id, filename, mime_type) VALUES (?1, ?2, ?3)",
        params![animal_id.0, photo.filename, photo.mime_type],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Photos of an animal in upload order.
pub fn photos_for_animal(conn: &Connection, animal_id: AnimalId) -> rusqlite::Result<Vec<Photo>> {
    let mut stmt = conn.prepare(
        "SELECT id, animal_id, filename, mime_type
         FROM animal_photos WHERE animal_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![animal_id.0], |row| {
        Ok(Photo {
            id: row.get(0)?,
            animal_id: AnimalId(row.get(1)?),
            filename: row.get(2)?,
            mime_type: row.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn delete_photos_for_animal(conn: &Connection, animal_id: AnimalId) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM animal_photos WHERE animal_id = ?1",
        params![animal_id.0],
    )
}
