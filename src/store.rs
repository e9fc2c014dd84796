// src/store.rs
//! Persistent key-value area holding the single profile and the API key

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::UserProfile;

pub const PROFILE_KEY: &str = "user-data";
pub const CREDENTIAL_KEY: &str = "gpt-key";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read key '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// String key-value storage. Reads and writes are synchronous.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ===== Backends =====

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Unavailable {
            path: root.clone(),
            source,
        })?;
        debug!("Opened file store at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.key_path(key), value).map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }
}

// ===== Profile Store =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub profile: UserProfile,
    pub credential: String,
}

/// Owns the durable profile and credential.
///
/// Any storage failure switches the store to an in-memory backend for the
/// rest of the session; the first failure is kept so it can be reported once.
pub struct ProfileStore {
    backend: Box<dyn KeyValueStore>,
    degraded: Option<StorageError>,
    reported: bool,
}

impl ProfileStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            degraded: None,
            reported: false,
        }
    }

    /// Store that starts out degraded, for when the backend could not even be opened.
    pub fn in_memory_after(error: StorageError) -> Self {
        warn!("Persistent storage unavailable, using in-memory profile: {}", error);
        Self {
            backend: Box::new(MemoryStore::new()),
            degraded: Some(error),
            reported: false,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Storage failure not yet shown to the user. Returns it at most once.
    pub fn take_unreported_failure(&mut self) -> Option<String> {
        if self.reported {
            return None;
        }
        let message = self.degraded.as_ref().map(ToString::to_string)?;
        self.reported = true;
        Some(message)
    }

    /// Reads both records, writing defaults back for whichever is missing.
    pub fn load(&mut self) -> Loaded {
        let credential = match self.read(CREDENTIAL_KEY) {
            Some(value) => value,
            None => {
                self.write(CREDENTIAL_KEY, "");
                String::new()
            }
        };

        let stored = self.read(PROFILE_KEY).and_then(|raw| {
            serde_json::from_str::<UserProfile>(&raw)
                .map_err(|e| warn!("Stored profile is not valid JSON, ignoring it: {}", e))
                .ok()
        });

        let profile = match stored {
            Some(profile) => profile,
            None => {
                let profile = UserProfile::blank();
                self.save_profile(&profile);
                info!("No stored profile, initialized blank profile");
                profile
            }
        };

        Loaded {
            profile,
            credential,
        }
    }

    /// Replaces the stored profile.
    pub fn save_profile(&mut self, profile: &UserProfile) {
        match serde_json::to_string(profile) {
            Ok(json) => self.write(PROFILE_KEY, &json),
            Err(e) => warn!("Failed to serialize profile: {}", e),
        }
    }

    /// Replaces the stored credential.
    pub fn save_credential(&mut self, credential: &str) {
        self.write(CREDENTIAL_KEY, credential);
    }

    fn read(&mut self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                self.degrade(e);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value) {
            self.degrade(e);
            // The memory backend cannot fail.
            let _ = self.backend.set(key, value);
        }
    }

    fn degrade(&mut self, error: StorageError) {
        if self.degraded.is_some() {
            return;
        }
        warn!("Persistent storage failed, continuing in memory: {}", error);

        // Carry over whatever the failing backend can still give us.
        let mut memory = MemoryStore::new();
        for key in [PROFILE_KEY, CREDENTIAL_KEY] {
            if let Ok(Some(value)) = self.backend.get(key) {
                let _ = memory.set(key, &value);
            }
        }
        self.backend = Box::new(memory);
        self.degraded = Some(error);
    }
}
