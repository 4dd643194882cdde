use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("ID space exhausted above {0}")]
    IdsExhausted(u64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Lock poisoned for {0}")]
    Poisoned(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One JSON document on disk, guarded by its own writer lock.
///
/// Every mutation holds the lock across the whole load/mutate/store cycle,
/// so two requests can never interleave their read-modify-write on the same
/// file.
pub(crate) struct Document {
    lock: Mutex<()>,
    path: PathBuf,
}

/// Exclusive access to a [`Document`] for the lifetime of the guard.
pub(crate) struct DocumentGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    path: &'a Path,
}

impl Document {
    fn new(path: PathBuf) -> Self {
        Self {
            lock: Mutex::new(()),
            path,
        }
    }

    pub(crate) fn lock(&self) -> Result<DocumentGuard<'_>, DatabaseError> {
        let guard = self
            .lock
            .lock()
            .map_err(|_| DatabaseError::Poisoned(self.path.display().to_string()))?;
        Ok(DocumentGuard {
            _guard: guard,
            path: &self.path,
        })
    }
}

impl DocumentGuard<'_> {
    /// Read the full collection. A missing file is the empty collection.
    pub(crate) fn load<T: DeserializeOwned + Default>(&self) -> Result<T, DatabaseError> {
        match std::fs::read(self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(T::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Rewrite the full collection.
    ///
    /// The snapshot is written to a sibling file and renamed over the live
    /// file, so readers see either the old or the new document.
    pub(crate) fn store<T: Serialize>(&self, value: &T) -> Result<(), DatabaseError> {
        let data = serde_json::to_vec(value)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, self.path)?;
        Ok(())
    }
}

struct Documents {
    id_lookup: Document,
    tokens: Document,
    tools: Document,
    users: Document,
}

#[derive(Clone)]
pub struct Database {
    docs: Arc<Documents>,
}

impl Database {
    /// Open (or create) the data directory holding the JSON documents
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let docs = Documents {
            id_lookup: Document::new(dir.join(ID_LOOKUP)),
            tokens: Document::new(dir.join(TOKENS)),
            tools: Document::new(dir.join(TOOLS)),
            users: Document::new(dir.join(USERS)),
        };

        Ok(Self {
            docs: Arc::new(docs),
        })
    }

    pub(crate) fn id_lookup(&self) -> &Document {
        &self.docs.id_lookup
    }

    pub(crate) fn tokens(&self) -> &Document {
        &self.docs.tokens
    }

    pub(crate) fn tools(&self) -> &Document {
        &self.docs.tools
    }

    pub(crate) fn users(&self) -> &Document {
        &self.docs.users
    }
}
