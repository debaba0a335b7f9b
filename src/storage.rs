//! Sled-backed persistence for player profiles.
//!
//! Profiles are single-writer: all mutation goes through
//! [`ProfileStore::with_profile`], which serializes access per profile id.
//! Interleaving hideout operations for the same profile outside that path
//! can double-start or double-collect jobs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use sled::IVec;

use crate::errors::HideoutError;
use crate::profile::Profile;
use crate::types::PROFILE_SCHEMA_VERSION;

const TREE_PROFILES: &str = "hideout_profiles";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct ProfileStoreBuilder {
    path: PathBuf,
}

impl ProfileStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<ProfileStore, HideoutError> {
        ProfileStore::open(self.path)
    }
}

/// Sled-backed profile persistence with per-profile write serialization.
pub struct ProfileStore {
    _db: sled::Db,
    profiles: sled::Tree,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProfileStore {
    /// Open (or create) the profile store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HideoutError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let profiles = db.open_tree(TREE_PROFILES)?;
        Ok(Self {
            _db: db,
            profiles,
            locks: Mutex::new(HashMap::new()),
        })
    }

    fn profile_key(profile_id: &str) -> Vec<u8> {
        format!("profiles:{}", profile_id).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, HideoutError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, HideoutError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    /// Insert or update a profile record.
    pub fn put_profile(&self, mut profile: Profile) -> Result<(), HideoutError> {
        profile.schema_version = PROFILE_SCHEMA_VERSION;
        profile.touch();
        let key = Self::profile_key(&profile.id);
        let bytes = Self::serialize(&profile)?;
        self.profiles.insert(key, bytes)?;
        self.profiles.flush()?;
        Ok(())
    }

    /// Fetch a profile record by id.
    pub fn get_profile(&self, profile_id: &str) -> Result<Profile, HideoutError> {
        let key = Self::profile_key(profile_id);
        let Some(bytes) = self.profiles.get(&key)? else {
            return Err(HideoutError::NotFound(format!("profile: {}", profile_id)));
        };
        let record: Profile = Self::deserialize(bytes)?;
        if record.schema_version != PROFILE_SCHEMA_VERSION {
            return Err(HideoutError::SchemaMismatch {
                entity: "profile",
                expected: PROFILE_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Remove a profile record. Quiet when absent.
    pub fn delete_profile(&self, profile_id: &str) -> Result<(), HideoutError> {
        self.profiles.remove(Self::profile_key(profile_id))?;
        self.profiles.flush()?;
        Ok(())
    }

    /// List all profile ids currently stored.
    pub fn list_profile_ids(&self) -> Result<Vec<String>, HideoutError> {
        let mut ids = Vec::new();
        for entry in self.profiles.scan_prefix(b"profiles:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(id) = text.strip_prefix("profiles:") {
                ids.push(id.to_string());
            }
        }
        Ok(ids)
    }

    fn lock_for(&self, profile_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(profile_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run a mutation against one profile under its write lock: load, apply,
    /// persist. The profile is only written back when the closure succeeds.
    ///
    /// This is the supported mutation path; it is what makes the
    /// one-operation-in-flight-per-profile rule hold.
    pub fn with_profile<T>(
        &self,
        profile_id: &str,
        f: impl FnOnce(&mut Profile) -> Result<T, HideoutError>,
    ) -> Result<T, HideoutError> {
        let lock = self.lock_for(profile_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut profile = self.get_profile(profile_id)?;
        let value = f(&mut profile)?;
        self.put_profile(profile)?;
        Ok(value)
    }
}
