//! Versioned read-modify-write access to the stored user profile.

use serde_json::Value;

use super::kv::KvStore;
use crate::error::{CoreError, StorageError};
use crate::profile::UserProfile;

pub const PROFILE_KEY: &str = "rootedUser";

fn decode(raw: &str) -> Result<UserProfile, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Corrupt {
        key: PROFILE_KEY.to_string(),
        message: e.to_string(),
    })
}

pub struct ProfileStore<S> {
    store: S,
}

impl<S: KvStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The stored profile, or `None` before the first sign-up.
    pub fn load(&self) -> Result<Option<UserProfile>, StorageError> {
        self.store
            .get(PROFILE_KEY)?
            .map(|raw| decode(&raw))
            .transpose()
    }

    /// Write `profile` back if nobody saved since it was loaded.
    ///
    /// The version check and the write happen in one store transaction. On
    /// success the profile's version is bumped to match what was stored.
    pub fn save(&self, profile: &mut UserProfile) -> Result<(), StorageError> {
        let expected = profile.version;
        self.write(profile, |found| {
            if found == expected {
                Ok(())
            } else {
                Err(StorageError::VersionConflict { expected, found })
            }
        })
    }

    /// Replace whatever is stored, ignoring versions. Used by sign-up,
    /// which starts a new profile from scratch.
    pub fn replace(&self, profile: &mut UserProfile) -> Result<(), StorageError> {
        self.write(profile, |_| Ok(()))
    }

    fn write<C>(&self, profile: &mut UserProfile, check: C) -> Result<(), StorageError>
    where
        C: Fn(u64) -> Result<(), StorageError>,
    {
        let mut next = profile.clone();
        self.store.modify(PROFILE_KEY, &mut |current| {
            let found = match current {
                Some(raw) => decode(&raw)?.version,
                None => 0,
            };
            check(found)?;
            next.version = found + 1;
            serde_json::to_string(&next).map_err(|e| StorageError::QueryFailed(e.to_string()))
        })?;
        profile.version = next.version;
        tracing::debug!(version = profile.version, "profile saved");
        Ok(())
    }

    /// Load, apply `f`, save. A missing profile starts from the default.
    pub fn update<F, E>(&self, f: F) -> Result<UserProfile, CoreError>
    where
        F: FnOnce(&mut UserProfile) -> Result<(), E>,
        CoreError: From<E>,
    {
        let mut profile = self.load()?.unwrap_or_default();
        f(&mut profile)?;
        self.save(&mut profile)?;
        Ok(profile)
    }

    /// Shallow-merge a JSON patch into the stored profile.
    pub fn merge(&self, patch: Value) -> Result<UserProfile, CoreError> {
        self.update(|p| p.merge(patch))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(PROFILE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::onboarding::apply_mentor;
    use crate::storage::kv::Modify;
    use crate::storage::{MemoryStore, SqliteStore};
    use serde_json::json;

    #[test]
    fn empty_store_has_no_profile() {
        let store = ProfileStore::new(MemoryStore::new());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_bumps_version() {
        let store = ProfileStore::new(MemoryStore::new());
        let mut profile = UserProfile {
            name: Some("Asha".into()),
            ..Default::default()
        };
        store.save(&mut profile).unwrap();
        assert_eq!(profile.version, 1);
        store.save(&mut profile).unwrap();
        assert_eq!(store.load().unwrap().unwrap().version, 2);
    }

    #[test]
    fn stale_save_conflicts() {
        let store = ProfileStore::new(MemoryStore::new());
        let mut first = UserProfile::default();
        store.save(&mut first).unwrap();

        let mut a = store.load().unwrap().unwrap();
        let mut b = store.load().unwrap().unwrap();
        a.name = Some("a".into());
        store.save(&mut a).unwrap();
        b.name = Some("b".into());
        let err = store.save(&mut b).unwrap_err();
        assert!(matches!(
            err,
            StorageError::VersionConflict { expected: 1, found: 2 }
        ));
        assert_eq!(b.version, 1);
        assert_eq!(store.load().unwrap().unwrap().name.as_deref(), Some("a"));
    }

    /// Store that lets another writer save just before each `modify`.
    struct RacingStore<'a> {
        inner: &'a MemoryStore,
        rival: std::cell::Cell<Option<&'static str>>,
    }

    impl KvStore for RacingStore<'_> {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
        fn modify(&self, key: &str, f: &mut Modify<'_>) -> Result<(), StorageError> {
            if let Some(name) = self.rival.take() {
                ProfileStore::new(self.inner)
                    .update(|p| {
                        p.name = Some(name.into());
                        Ok::<_, CoreError>(())
                    })
                    .unwrap();
            }
            self.inner.modify(key, f)
        }
    }

    #[test]
    fn save_racing_another_writer_conflicts() {
        let kv = MemoryStore::new();
        ProfileStore::new(&kv)
            .save(&mut UserProfile::default())
            .unwrap();

        let racing = RacingStore {
            inner: &kv,
            rival: std::cell::Cell::new(Some("other-writer")),
        };
        let store = ProfileStore::new(&racing);
        let mut mine = store.load().unwrap().unwrap();
        mine.email = Some("me@x".into());

        let err = store.save(&mut mine).unwrap_err();
        assert!(matches!(
            err,
            StorageError::VersionConflict { expected: 1, found: 2 }
        ));
        assert_eq!(mine.version, 1);
        let stored = ProfileStore::new(&kv).load().unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("other-writer"));
        assert!(stored.email.is_none());
        assert_eq!(stored.version, 2);
    }

    #[test]
    fn stale_save_conflicts_across_sqlite_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooted.db");
        let a = SqliteStore::open_at(&path).unwrap();
        let b = SqliteStore::open_at(&path).unwrap();
        ProfileStore::new(&a)
            .save(&mut UserProfile::default())
            .unwrap();

        let mut mine = ProfileStore::new(&a).load().unwrap().unwrap();
        ProfileStore::new(&b).merge(json!({ "name": "b" })).unwrap();
        mine.name = Some("a".into());
        let err = ProfileStore::new(&a).save(&mut mine).unwrap_err();
        assert!(matches!(err, StorageError::VersionConflict { .. }));
        let stored = ProfileStore::new(&a).load().unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("b"));
    }

    #[test]
    fn browser_profile_without_version_loads() {
        let kv = MemoryStore::new();
        kv.set(PROFILE_KEY, r#"{"email":"x@y.z","theme":"dark"}"#).unwrap();
        let store = ProfileStore::new(&kv);
        let mut profile = store.load().unwrap().unwrap();
        assert_eq!(profile.version, 0);
        store.save(&mut profile).unwrap();
        let raw: Value = serde_json::from_str(&kv.get(PROFILE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["version"], 1);
    }

    #[test]
    fn corrupt_json_is_reported() {
        let kv = MemoryStore::new();
        kv.set(PROFILE_KEY, "{not json").unwrap();
        let store = ProfileStore::new(&kv);
        assert!(matches!(store.load(), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn update_and_merge() {
        let store = ProfileStore::new(MemoryStore::new());
        let profile = store
            .update(|p| apply_mentor(p, "owl"))
            .unwrap();
        assert_eq!(profile.version, 1);

        let merged = store.merge(json!({ "onboardingStep": "done" })).unwrap();
        assert_eq!(merged.onboarding_step.as_deref(), Some("done"));
        assert_eq!(merged.mentor.as_ref().unwrap().id, "owl");
        assert_eq!(merged.version, 2);
    }

    #[test]
    fn failed_update_writes_nothing() {
        let store = ProfileStore::new(MemoryStore::new());
        let err = store.update(|p| apply_mentor(p, "dragon")).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnknownId { .. })
        ));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn replace_ignores_versions() {
        let store = ProfileStore::new(MemoryStore::new());
        let mut old = UserProfile::default();
        store.save(&mut old).unwrap();
        store.save(&mut old).unwrap();
        let mut fresh = UserProfile {
            name: Some("new".into()),
            ..Default::default()
        };
        store.replace(&mut fresh).unwrap();
        assert_eq!(fresh.version, 3);
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
