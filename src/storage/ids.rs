use std::collections::HashSet;

use super::db::{Database, DatabaseError};
use super::models::IdLookup;

/// Distance between the bands of two keywords
pub const BAND_SIZE: u64 = 1000;

/// Band a keyword gets when it is first seen: one band past the highest
/// band issued so far, regardless of which keyword owns it.
pub fn next_band(table: &IdLookup) -> Result<u64, DatabaseError> {
    let highest = table.values().copied().max().unwrap_or(0);
    highest
        .checked_add(BAND_SIZE)
        .ok_or(DatabaseError::IdsExhausted(highest))
}

/// First value at or above `start` that is not taken
pub fn next_free_id(existing: &HashSet<u64>, start: u64) -> Result<u64, DatabaseError> {
    let mut id = start;
    while existing.contains(&id) {
        id = id.checked_add(1).ok_or(DatabaseError::IdsExhausted(start))?;
    }
    Ok(id)
}

impl Database {
    // ========================================================================
    // ID allocation
    // ========================================================================

    /// Snapshot of the keyword bands
    pub fn get_id_lookup(&self) -> Result<IdLookup, DatabaseError> {
        self.id_lookup().lock()?.load()
    }

    /// Look up the band of a keyword, creating and persisting it when missing.
    ///
    /// A new band is written immediately and never rolled back, even when the
    /// caller ends up not storing anything with it.
    pub fn band_for(&self, keyword: &str) -> Result<u64, DatabaseError> {
        let guard = self.id_lookup().lock()?;
        let mut table: IdLookup = guard.load()?;

        if let Some(band) = table.get(keyword) {
            return Ok(*band);
        }

        let band = next_band(&table)?;
        table.insert(keyword.to_string(), band);
        guard.store(&table)?;
        tracing::debug!(keyword = %keyword, band, "Created ID band");
        Ok(band)
    }

    /// Allocate an ID that is not in `existing`, starting from the band of
    /// `namespace` or from 1 without one.
    pub fn allocate_id(
        &self,
        existing: &HashSet<u64>,
        namespace: Option<&str>,
    ) -> Result<u64, DatabaseError> {
        let start = match namespace {
            Some(keyword) => self.band_for(keyword)?,
            None => 1,
        };
        next_free_id(existing, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::setup_db;

    #[test]
    fn test_next_free_id_skips_taken() {
        let existing: HashSet<u64> = [1, 2, 4].into_iter().collect();
        assert_eq!(next_free_id(&existing, 1).unwrap(), 3);
        assert_eq!(next_free_id(&existing, 4).unwrap(), 5);
        assert_eq!(next_free_id(&HashSet::new(), 1000).unwrap(), 1000);
    }

    #[test]
    fn test_no_namespace_starts_at_one() {
        let (db, _temp) = setup_db();

        assert_eq!(db.allocate_id(&HashSet::new(), None).unwrap(), 1);
        let existing: HashSet<u64> = [1, 2].into_iter().collect();
        assert_eq!(db.allocate_id(&existing, None).unwrap(), 3);
        assert!(db.get_id_lookup().unwrap().is_empty());
    }

    #[test]
    fn test_bands_are_global_and_first_seen() {
        let (db, _temp) = setup_db();

        assert_eq!(db.band_for("acme").unwrap(), 1000);
        assert_eq!(db.band_for("bosch").unwrap(), 2000);
        assert_eq!(db.band_for("acme").unwrap(), 1000);
        assert_eq!(db.band_for("makita").unwrap(), 3000);

        let table = db.get_id_lookup().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table["bosch"], 2000);
    }

    #[test]
    fn test_new_band_follows_highest_value() {
        let mut table = IdLookup::new();
        assert_eq!(next_band(&table).unwrap(), 1000);
        table.insert("z".to_string(), 5000);
        table.insert("a".to_string(), 1000);
        assert_eq!(next_band(&table).unwrap(), 6000);
    }

    #[test]
    fn test_band_overflow_is_an_error() {
        let (db, temp) = setup_db();
        std::fs::write(
            temp.path().join(crate::storage::ID_LOOKUP),
            format!(r#"{{"acme": {}}}"#, u64::MAX),
        )
        .unwrap();

        assert_eq!(db.band_for("acme").unwrap(), u64::MAX);
        let result = db.band_for("bosch");
        assert!(matches!(result, Err(DatabaseError::IdsExhausted(u64::MAX))));
        assert!(!db.get_id_lookup().unwrap().contains_key("bosch"));
    }

    #[test]
    fn test_free_id_overflow_is_an_error() {
        let existing: HashSet<u64> = [u64::MAX - 1, u64::MAX].into_iter().collect();
        let result = next_free_id(&existing, u64::MAX - 1);
        assert!(matches!(result, Err(DatabaseError::IdsExhausted(_))));
    }

    #[test]
    fn test_band_persisted_without_record() {
        let (db, temp) = setup_db();

        db.allocate_id(&HashSet::new(), Some("acme")).unwrap();

        let reopened = Database::open(temp.path()).unwrap();
        assert_eq!(reopened.get_id_lookup().unwrap()["acme"], 1000);
    }

    #[test]
    fn test_namespaced_allocation_skips_taken() {
        let (db, _temp) = setup_db();

        let existing: HashSet<u64> = [1000, 1001].into_iter().collect();
        assert_eq!(db.allocate_id(&existing, Some("acme")).unwrap(), 1002);
    }
}
