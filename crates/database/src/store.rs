//! Whole-document JSON storage.
//!
//! Every document lives in its own file under the store root and is always
//! rewritten in full. Writes go to a temp file in the same directory which is
//! then renamed over the target, so a crash mid-write leaves the previous
//! version intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{DatabaseError, Result};

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    schema_version: u32,
    entries: &'a T,
}

#[derive(Deserialize)]
struct Header {
    schema_version: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Versioned<T> {
    schema_version: u32,
    entries: T,
}

/// Reads and writes named JSON documents in a directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at `root`. The directory is not touched.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a named document.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load a document, returning `T::default()` if the file does not exist.
    pub fn load<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let raw = match fs::read_to_string(self.path(name)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(document = name, "document missing, using defaults");
                return Ok(T::default());
            }
            Err(e) => return Err(e.into()),
        };

        // Bare documents written before the envelope have no schema_version.
        let header = serde_json::from_str::<Header>(&raw).ok();
        let Some(version) = header.and_then(|h| h.schema_version) else {
            debug!(document = name, "read unversioned document");
            return Ok(serde_json::from_str(&raw)?);
        };

        if version.as_u64().map_or(true, |v| v > u64::from(SCHEMA_VERSION)) {
            return Err(DatabaseError::UnsupportedSchema {
                document: name.to_string(),
                version: version.to_string(),
            });
        }

        let versioned: Versioned<T> = serde_json::from_str(&raw)?;
        debug!(document = name, version = versioned.schema_version, "read document");
        Ok(versioned.entries)
    }

    /// Overwrite a document atomically with pretty-printed JSON.
    pub fn save<T>(&self, name: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let encoded = Self::encode(value)?;
        self.write(name, &encoded)
    }

    /// Serialize `value` inside the schema envelope.
    pub fn encode<T>(value: &T) -> Result<Vec<u8>>
    where
        T: Serialize,
    {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            entries: value,
        };

        let mut encoded = serde_json::to_vec_pretty(&envelope)?;
        encoded.push(b'\n');
        Ok(encoded)
    }

    /// Atomically replace a document with already encoded bytes.
    ///
    /// Blocking: temp file write, fsync and rename.
    pub fn write(&self, name: &str, encoded: &[u8]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path(name)).map_err(|e| DatabaseError::Io(e.error))?;

        Ok(())
    }
}

/// A loaded document with a single guarded in-memory copy.
///
/// All mutations go through [`Document::update`], which persists the new
/// state before the lock is released, so saves of one document never
/// interleave. The file write itself runs on the blocking pool.
#[derive(Debug)]
pub struct Document<T> {
    name: &'static str,
    store: DocumentStore,
    state: Mutex<T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    /// Load `name` from the store.
    pub fn open(store: &DocumentStore, name: &'static str) -> Result<Self> {
        let state = store.load(name)?;
        Ok(Self {
            name,
            store: store.clone(),
            state: Mutex::new(state),
        })
    }

    /// File name of this document.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run `f` against the current state without persisting.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Clone of the current state.
    pub async fn snapshot(&self) -> T {
        self.state.lock().await.clone()
    }

    /// Mutate the state and persist it.
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        self.update_if(|state| (f(state), true)).await
    }

    /// Mutate the state, persisting only when `f` reports a change.
    ///
    /// If the save fails the in-memory copy keeps the mutation and the error
    /// is returned to the caller.
    pub async fn update_if<R>(&self, f: impl FnOnce(&mut T) -> (R, bool)) -> Result<R> {
        let mut state = self.state.lock().await;
        let (result, changed) = f(&mut state);
        if changed {
            if let Err(e) = self.persist(&state).await {
                warn!(document = self.name, error = %e, "save failed, memory and disk diverge");
                return Err(e);
            }
        }
        Ok(result)
    }

    async fn persist(&self, state: &T) -> Result<()> {
        let encoded = DocumentStore::encode(state)?;
        let store = self.store.clone();
        let name = self.name;

        tokio::task::spawn_blocking(move || store.write(name, &encoded))
            .await
            .map_err(|e| DatabaseError::Task(e.to_string()))?
    }
}
