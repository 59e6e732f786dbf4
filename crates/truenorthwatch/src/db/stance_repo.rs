//! Platform stance repository: reads and batch writes for `platform_stances`.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;

use super::{format_timestamp, parse_timestamp, Database, DatabaseError};
use crate::categorizer::Category;
use crate::stance::Stance;

/// A stored stance of one party on one category for one election year.
///
/// (party_id, election_year, category) is unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStanceRecord {
    pub id: i64,
    pub party_id: i64,
    pub election_year: i32,
    pub category: Category,
    pub stance: Stance,
    pub created_at: DateTime<Utc>,
}

/// A stance record that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStanceRecord {
    pub party_id: i64,
    pub election_year: i32,
    pub category: Category,
    pub stance: Stance,
    pub created_at: DateTime<Utc>,
}

struct RawStance {
    id: i64,
    party_id: i64,
    election_year: i32,
    category: Category,
    stance: Stance,
    created_at: String,
}

impl RawStance {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            party_id: row.get("party_id")?,
            election_year: row.get("election_year")?,
            category: row.get("category")?,
            stance: row.get("stance")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_record(self) -> Result<PlatformStanceRecord, DatabaseError> {
        Ok(PlatformStanceRecord {
            id: self.id,
            party_id: self.party_id,
            election_year: self.election_year,
            category: self.category,
            stance: self.stance,
            created_at: parse_timestamp("created_at", self.created_at)?,
        })
    }
}

/// Inserts records in one transaction. Rows whose natural key already exists
/// are skipped, so concurrent writers converge on a single set.
/// Returns the number of rows actually inserted.
pub fn insert_batch(db: &Database, records: &[NewStanceRecord]) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO platform_stances (party_id, election_year, category, stance, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (party_id, election_year, category) DO NOTHING",
            )?;
            for record in records {
                inserted += stmt.execute(params![
                    record.party_id,
                    record.election_year,
                    record.category,
                    record.stance,
                    format_timestamp(&record.created_at),
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    })
}

/// All records for a party and election year, in insertion order.
pub fn find_by_party_year(
    db: &Database,
    party_id: i64,
    election_year: i32,
) -> Result<Vec<PlatformStanceRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, party_id, election_year, category, stance, created_at
             FROM platform_stances
             WHERE party_id = ?1 AND election_year = ?2
             ORDER BY id",
        )?;
        let raw = stmt
            .query_map(params![party_id, election_year], RawStance::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raw.into_iter().map(RawStance::into_record).collect()
    })
}

/// Counts records for a party and election year.
pub fn count_by_party_year(
    db: &Database,
    party_id: i64,
    election_year: i32,
) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM platform_stances WHERE party_id = ?1 AND election_year = ?2",
            params![party_id, election_year],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}
