//! Party repository: CRUD operations for the `parties` table.

use chrono::{DateTime, Utc};
use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use serde::Serialize;

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};

/// A political party.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Columns as read, before timestamp parsing.
struct RawParty {
    id: i64,
    name: String,
    created_at: String,
}

impl RawParty {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_party(self) -> Result<PartyRow, DatabaseError> {
        Ok(PartyRow {
            id: self.id,
            name: self.name,
            created_at: parse_timestamp("created_at", self.created_at)?,
        })
    }
}

/// Inserts a new party and returns it with its assigned id.
pub fn insert(db: &Database, name: &str) -> Result<PartyRow, DatabaseError> {
    let created_at = Utc::now();
    db.with_conn(|conn| {
        let result = conn.execute(
            "INSERT INTO parties (name, created_at) VALUES (?1, ?2)",
            params![name, format_timestamp(&created_at)],
        );
        match result {
            Ok(_) => Ok(PartyRow {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                created_at,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(DatabaseError::DuplicateParty(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    })
}

/// Finds a party by its ID.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<PartyRow>, DatabaseError> {
    db.with_conn(|conn| {
        conn.query_row(
            "SELECT id, name, created_at FROM parties WHERE id = ?1",
            params![id],
            RawParty::from_row,
        )
        .optional()?
        .map(RawParty::into_party)
        .transpose()
    })
}

/// Finds a party by its exact name.
pub fn find_by_name(db: &Database, name: &str) -> Result<Option<PartyRow>, DatabaseError> {
    db.with_conn(|conn| {
        conn.query_row(
            "SELECT id, name, created_at FROM parties WHERE name = ?1",
            params![name],
            RawParty::from_row,
        )
        .optional()?
        .map(RawParty::into_party)
        .transpose()
    })
}

/// Lists all parties ordered by id.
pub fn list(db: &Database) -> Result<Vec<PartyRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM parties ORDER BY id")?;
        let raw = stmt
            .query_map([], RawParty::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(RawParty::into_party).collect()
    })
}
