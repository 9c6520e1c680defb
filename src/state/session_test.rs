use super::*;

fn admin() -> Profile {
    Profile::new(1, "Ana", "ana@shop.com", [Role::Admin]).unwrap()
}

fn employee() -> Profile {
    Profile::new(2, "Luis", "luis@shop.com", [Role::Employee]).unwrap()
}

/// Storage whose writes always fail, as with an exceeded quota.
#[derive(Default)]
struct FullStorage {
    inner: MemoryStorage,
}

impl SessionStorage for FullStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("quota exceeded".to_owned()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

/// Storage that cannot be reached at all.
struct DeadStorage;

impl SessionStorage for DeadStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Storage that reads and writes but refuses to delete anything.
#[derive(Default)]
struct StuckStorage {
    inner: MemoryStorage,
}

impl SessionStorage for StuckStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("removal blocked".to_owned()))
    }
}

fn assert_consistent<S: SessionStorage>(store: &SessionStore<S>) {
    assert_eq!(store.token().is_some(), store.profile().is_some());
    assert_eq!(store.is_authenticated(), store.token().is_some());
}

// =============================================================
// Defaults and predicates
// =============================================================

#[test]
fn new_store_is_anonymous() {
    let store = SessionStore::new(MemoryStorage::new());
    assert!(!store.is_authenticated());
    assert_eq!(store.primary_role(), None);
    assert!(!store.has_role(Role::Admin));
    assert!(!store.is_admin());
    assert!(!store.is_employee());
    assert_consistent(&store);
}

#[test]
fn set_session_installs_token_and_profile() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.set_session("tok", admin());
    assert!(store.is_authenticated());
    assert_eq!(store.token(), Some("tok"));
    assert_eq!(store.profile(), Some(&admin()));
    assert!(store.is_admin());
    assert!(!store.is_employee());
    assert_eq!(store.primary_role(), Some(Role::Admin));
    assert_consistent(&store);
}

#[test]
fn primary_role_is_first_role() {
    let mut store = SessionStore::new(MemoryStorage::new());
    let both = Profile::new(3, "Eva", "eva@shop.com", [Role::Employee, Role::Admin]).unwrap();
    store.set_session("tok", both);
    assert_eq!(store.primary_role(), Some(Role::Employee));
    assert!(store.has_role(Role::Admin));
}

#[test]
fn set_session_with_empty_token_clears_session() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.set_session("tok", admin());
    store.set_session("", employee());
    assert!(!store.is_authenticated());
    assert!(store.storage().is_empty());
    assert_consistent(&store);
}

// =============================================================
// Persistence
// =============================================================

#[test]
fn set_session_writes_single_record() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.set_session("tok", employee());

    assert_eq!(storage.len(), 1);
    let raw = storage.get(SESSION_KEY).unwrap().unwrap();
    let record: Session = serde_json::from_str(&raw).unwrap();
    assert_eq!(record, Session { token: "tok".to_owned(), profile: employee() });
}

#[test]
fn set_session_round_trips_through_fresh_store() {
    let storage = MemoryStorage::new();
    let mut first = SessionStore::new(storage.clone());
    first.set_session("tok", admin());

    let mut second = SessionStore::new(storage);
    assert!(second.hydrate_from_storage());
    assert_eq!(second.snapshot(), first.snapshot());
    assert_eq!(second.token(), Some("tok"));
    assert_eq!(second.profile(), Some(&admin()));
}

#[test]
fn set_session_survives_failed_write() {
    let mut store = SessionStore::new(FullStorage::default());
    store.set_session("tok", admin());
    assert!(store.is_authenticated());
    assert_eq!(store.token(), Some("tok"));
    assert_eq!(store.storage().inner.get(SESSION_KEY).unwrap(), None);
}

#[test]
fn set_profile_refreshes_existing_session() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.set_session("tok", employee());

    let promoted = Profile::new(2, "Luis", "luis@shop.com", [Role::Admin, Role::Employee]).unwrap();
    assert!(store.set_profile(promoted.clone()));
    assert_eq!(store.token(), Some("tok"));
    assert_eq!(store.profile(), Some(&promoted));

    let mut reloaded = SessionStore::new(storage);
    reloaded.hydrate_from_storage();
    assert_eq!(reloaded.profile(), Some(&promoted));
}

#[test]
fn set_profile_while_anonymous_is_ignored() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    assert!(!store.set_profile(admin()));
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
    assert_consistent(&store);
}

// =============================================================
// Hydration
// =============================================================

#[test]
fn hydrate_with_empty_storage_stays_anonymous() {
    let mut store = SessionStore::new(MemoryStorage::new());
    assert!(!store.hydrate_from_storage());
    assert!(!store.is_authenticated());
}

#[test]
fn hydrate_twice_matches_hydrate_once_for_valid_record() {
    let storage = MemoryStorage::new();
    SessionStore::new(storage.clone()).set_session("tok", admin());

    let mut once = SessionStore::new(storage.clone());
    once.hydrate_from_storage();
    let mut twice = SessionStore::new(storage);
    twice.hydrate_from_storage();
    twice.hydrate_from_storage();
    assert_eq!(once.snapshot(), twice.snapshot());
    assert!(twice.is_authenticated());
}

#[test]
fn hydrate_twice_matches_hydrate_once_for_corrupt_record() {
    let storage = MemoryStorage::new();
    storage.set(SESSION_KEY, "{not json").unwrap();

    let mut store = SessionStore::new(storage);
    store.hydrate_from_storage();
    let after_once = store.snapshot();
    store.hydrate_from_storage();
    assert_eq!(store.snapshot(), after_once);
    assert!(!store.is_authenticated());
}

#[test]
fn hydrate_discards_corrupt_record() {
    let storage = MemoryStorage::new();
    storage.set(SESSION_KEY, "{not json").unwrap();

    let mut store = SessionStore::new(storage.clone());
    assert!(!store.hydrate_from_storage());
    assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
}

#[test]
fn hydrate_rejects_record_with_unknown_role() {
    let storage = MemoryStorage::new();
    let raw = r#"{"token":"tok","profile":{"id":1,"name":"Ana","email":"ana@shop.com","roles":["Owner"]}}"#;
    storage.set(SESSION_KEY, raw).unwrap();

    let mut store = SessionStore::new(storage);
    assert!(!store.hydrate_from_storage());
    assert_consistent(&store);
}

#[test]
fn hydrate_rejects_record_without_profile() {
    let storage = MemoryStorage::new();
    storage.set(SESSION_KEY, r#"{"token":"tok"}"#).unwrap();

    let mut store = SessionStore::new(storage);
    assert!(!store.hydrate_from_storage());
    assert_consistent(&store);
}

#[test]
fn hydrate_rejects_record_with_empty_token() {
    let storage = MemoryStorage::new();
    let raw = r#"{"token":"","profile":{"id":1,"name":"Ana","email":"ana@shop.com","roles":["Admin"]}}"#;
    storage.set(SESSION_KEY, raw).unwrap();

    let mut store = SessionStore::new(storage);
    assert!(!store.hydrate_from_storage());
}

#[test]
fn hydrate_does_not_replace_in_memory_session() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.set_session("mine", admin());

    let other = Session { token: "other".to_owned(), profile: employee() };
    storage.set(SESSION_KEY, &serde_json::to_string(&other).unwrap()).unwrap();

    assert!(store.hydrate_from_storage());
    assert_eq!(store.token(), Some("mine"));
}

#[test]
fn hydrate_with_unreachable_storage_stays_anonymous() {
    let mut store = SessionStore::new(DeadStorage);
    assert!(!store.hydrate_from_storage());
    store.logout();
    assert!(!store.is_authenticated());
}

// =============================================================
// Legacy split-key layout
// =============================================================

#[test]
fn hydrate_token_without_profile_stays_anonymous() {
    let storage = MemoryStorage::new();
    storage.set(LEGACY_TOKEN_KEY, "abc").unwrap();

    let mut store = SessionStore::new(storage);
    store.hydrate_from_storage();
    assert!(!store.is_authenticated());
    assert_consistent(&store);
}

#[test]
fn hydrate_profile_without_token_stays_anonymous() {
    let storage = MemoryStorage::new();
    storage.set(LEGACY_PROFILE_KEY, &serde_json::to_string(&admin()).unwrap()).unwrap();

    let mut store = SessionStore::new(storage);
    assert!(!store.hydrate_from_storage());
}

#[test]
fn hydrate_legacy_corrupt_profile_stays_anonymous() {
    let storage = MemoryStorage::new();
    storage.set(LEGACY_TOKEN_KEY, "abc").unwrap();
    storage.set(LEGACY_PROFILE_KEY, "[").unwrap();

    let mut store = SessionStore::new(storage);
    assert!(!store.hydrate_from_storage());
}

#[test]
fn hydrate_migrates_complete_legacy_record() {
    let storage = MemoryStorage::new();
    storage.set(LEGACY_TOKEN_KEY, "abc").unwrap();
    storage.set(LEGACY_PROFILE_KEY, &serde_json::to_string(&employee()).unwrap()).unwrap();

    let mut store = SessionStore::new(storage.clone());
    assert!(store.hydrate_from_storage());
    assert_eq!(store.token(), Some("abc"));
    assert_eq!(store.profile(), Some(&employee()));

    assert_eq!(storage.get(LEGACY_TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(LEGACY_PROFILE_KEY).unwrap(), None);
    assert!(storage.get(SESSION_KEY).unwrap().is_some());
}

// =============================================================
// Logout
// =============================================================

#[test]
fn logout_clears_memory_and_storage() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.set_session("tok", admin());
    storage.set(LEGACY_TOKEN_KEY, "old").unwrap();

    store.logout();
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
    assert_consistent(&store);

    let mut reloaded = SessionStore::new(storage);
    assert!(!reloaded.hydrate_from_storage());
}

#[test]
fn logout_is_idempotent() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.logout();
    store.set_session("tok", employee());
    store.logout();
    store.logout();
    assert!(!store.is_authenticated());
    assert_consistent(&store);
}

// =============================================================
// Key removal
// =============================================================

#[test]
fn remove_keys_counts_confirmed_removals() {
    let store = SessionStore::new(MemoryStorage::new());
    store.storage().set(LEGACY_TOKEN_KEY, "tok").unwrap();
    assert_eq!(store.remove_keys(&[LEGACY_TOKEN_KEY, LEGACY_PROFILE_KEY]), 2);
    assert!(store.storage().is_empty());
}

#[test]
fn remove_keys_reports_refused_removals() {
    let store = SessionStore::new(StuckStorage::default());
    assert_eq!(store.remove_keys(&[SESSION_KEY, LEGACY_TOKEN_KEY]), 0);
}

#[test]
fn corrupt_record_that_cannot_be_deleted_still_hydrates_anonymous() {
    let mut store = SessionStore::new(StuckStorage::default());
    store.storage().set(SESSION_KEY, "{not json").unwrap();

    assert!(!store.hydrate_from_storage());
    assert!(!store.hydrate_from_storage());
    assert_consistent(&store);
}

#[test]
fn legacy_migration_survives_undeletable_legacy_keys() {
    let mut store = SessionStore::new(StuckStorage::default());
    let profile = serde_json::to_string(&admin()).unwrap();
    store.storage().set(LEGACY_TOKEN_KEY, "old").unwrap();
    store.storage().set(LEGACY_PROFILE_KEY, &profile).unwrap();

    assert!(store.hydrate_from_storage());
    assert_eq!(store.token(), Some("old"));
    assert!(store.storage().get(SESSION_KEY).unwrap().is_some());
}

#[test]
fn logout_with_undeletable_storage_still_clears_memory() {
    let mut store = SessionStore::new(StuckStorage::default());
    store.set_session("tok", employee());
    store.logout();
    assert!(!store.is_authenticated());
}

// =============================================================
// SharedSession
// =============================================================

#[test]
fn shared_session_clones_see_same_state() {
    let session = SharedSession::in_memory();
    let other = session.clone();
    session.set_session("tok", admin());
    assert!(other.is_authenticated());
    assert_eq!(other.token(), Some("tok".to_owned()));

    other.logout();
    assert!(!session.is_authenticated());
    assert_eq!(session.snapshot(), None);
}

#[test]
fn shared_session_teardown_clears_storage() {
    let session = SharedSession::in_memory();
    session.set_session("tok", employee());
    let storage = session.read(|s| s.storage().clone());

    session.teardown();
    assert!(storage.is_empty());
}

#[test]
fn shared_session_hydrates_from_shared_storage() {
    let first = SharedSession::in_memory();
    first.set_session("tok", employee());
    let storage = first.read(|s| s.storage().clone());

    let second = SharedSession::new(storage);
    assert!(second.hydrate_from_storage());
    assert_eq!(second.snapshot(), first.snapshot());
    assert!(second.set_profile(admin()));
    assert!(second.read(SessionStore::is_admin));
}
