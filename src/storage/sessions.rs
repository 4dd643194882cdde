use chrono::{DateTime, Duration, Utc};

use super::db::{Database, DatabaseError};
use super::models::SessionToken;

impl Database {
    // ========================================================================
    // Session token operations
    // ========================================================================

    pub fn get_all_sessions(&self) -> Result<Vec<SessionToken>, DatabaseError> {
        self.tokens().lock()?.load()
    }

    /// Store a session token, dropping any other token of the same user
    pub fn put_session(&self, session: &SessionToken) -> Result<(), DatabaseError> {
        debug_assert!(!session.token_hash.is_empty(), "token hash must not be empty");

        let guard = self.tokens().lock()?;
        let mut sessions: Vec<SessionToken> = guard.load()?;
        sessions.retain(|s| s.username != session.username);
        sessions.push(session.clone());
        guard.store(&sessions)?;
        Ok(())
    }

    /// Drop every token expired at `now` and return the ones still live.
    ///
    /// The file is only rewritten when something was dropped.
    pub fn retain_live_sessions(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(Vec<SessionToken>, usize), DatabaseError> {
        let guard = self.tokens().lock()?;
        let mut sessions: Vec<SessionToken> = guard.load()?;

        let before = sessions.len();
        sessions.retain(|s| !s.is_expired_at(now, ttl));
        let dropped = before - sessions.len();

        if dropped > 0 {
            guard.store(&sessions)?;
        }
        Ok((sessions, dropped))
    }

    /// Remove the first token accepted by `matches`
    pub fn delete_session_where<F>(&self, mut matches: F) -> Result<bool, DatabaseError>
    where
        F: FnMut(&SessionToken) -> bool,
    {
        let guard = self.tokens().lock()?;
        let mut sessions: Vec<SessionToken> = guard.load()?;

        match sessions.iter().position(|s| matches(s)) {
            Some(index) => {
                sessions.remove(index);
                guard.store(&sessions)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_session, setup_db};

    #[test]
    fn test_put_session_replaces_same_user() {
        let (db, _temp) = setup_db();

        db.put_session(&make_session("h1", "alice", Utc::now())).unwrap();
        db.put_session(&make_session("h2", "bob", Utc::now())).unwrap();
        db.put_session(&make_session("h3", "alice", Utc::now())).unwrap();

        let sessions = db.get_all_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().any(|s| s.token_hash == "h3"));
        assert!(!sessions.iter().any(|s| s.token_hash == "h1"));
    }

    #[test]
    fn test_retain_live_sessions_drops_expired() {
        let (db, _temp) = setup_db();
        let now = Utc::now();
        let ttl = Duration::minutes(60);

        db.put_session(&make_session("old", "alice", now - Duration::minutes(61)))
            .unwrap();
        db.put_session(&make_session("new", "bob", now - Duration::minutes(5)))
            .unwrap();

        let (live, dropped) = db.retain_live_sessions(now, ttl).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].token_hash, "new");
        assert_eq!(db.get_all_sessions().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_session_where() {
        let (db, _temp) = setup_db();

        db.put_session(&make_session("h1", "alice", Utc::now())).unwrap();

        assert!(db.delete_session_where(|s| s.token_hash == "h1").unwrap());
        assert!(!db.delete_session_where(|s| s.token_hash == "h1").unwrap());
        assert!(db.get_all_sessions().unwrap().is_empty());
    }
}
