//! Persistence seam used by the platform pipeline.

use async_trait::async_trait;

use super::stance_repo::{NewStanceRecord, PlatformStanceRecord};
use super::{party_repo, stance_repo, Database, DatabaseError};

/// Storage the pipeline reads cached stances from and writes new ones to.
#[async_trait]
pub trait StanceStore: Send + Sync {
    async fn find_stance_records(
        &self,
        party_id: i64,
        election_year: i32,
    ) -> Result<Vec<PlatformStanceRecord>, DatabaseError>;

    /// `None` when no party has this id.
    async fn find_party_name(&self, party_id: i64) -> Result<Option<String>, DatabaseError>;

    /// Stores the batch, skipping records whose natural key exists.
    /// Returns how many were inserted.
    async fn insert_stance_records(
        &self,
        records: Vec<NewStanceRecord>,
    ) -> Result<usize, DatabaseError>;
}

/// [`StanceStore`] over the SQLite [`Database`]. Queries run on the blocking
/// thread pool.
#[derive(Clone)]
pub struct SqliteStanceStore {
    db: Database,
}

impl SqliteStanceStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn blocking<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Database) -> Result<T, DatabaseError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| DatabaseError::Task(e.to_string()))?
    }
}

#[async_trait]
impl StanceStore for SqliteStanceStore {
    async fn find_stance_records(
        &self,
        party_id: i64,
        election_year: i32,
    ) -> Result<Vec<PlatformStanceRecord>, DatabaseError> {
        self.blocking(move |db| stance_repo::find_by_party_year(db, party_id, election_year))
            .await
    }

    async fn find_party_name(&self, party_id: i64) -> Result<Option<String>, DatabaseError> {
        self.blocking(move |db| {
            Ok(party_repo::find_by_id(db, party_id)?.map(|party| party.name))
        })
        .await
    }

    async fn insert_stance_records(
        &self,
        records: Vec<NewStanceRecord>,
    ) -> Result<usize, DatabaseError> {
        self.blocking(move |db| stance_repo::insert_batch(db, &records))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::categorizer::Category;
    use crate::stance::Stance;

    #[tokio::test]
    async fn test_store_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let party = party_repo::insert(&db, "NDP").unwrap();
        let store = SqliteStanceStore::new(db);

        assert_eq!(
            store.find_party_name(party.id).await.unwrap().as_deref(),
            Some("NDP")
        );
        assert!(store.find_party_name(party.id + 1).await.unwrap().is_none());

        let records = vec![NewStanceRecord {
            party_id: party.id,
            election_year: 2021,
            category: Category::HealthCare,
            stance: Stance::Positive,
            created_at: Utc::now(),
        }];
        assert_eq!(store.insert_stance_records(records.clone()).await.unwrap(), 1);
        assert_eq!(store.insert_stance_records(records).await.unwrap(), 0);

        let stored = store.find_stance_records(party.id, 2021).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].category, Category::HealthCare);
        assert_eq!(stored[0].stance, Stance::Positive);
    }
}
