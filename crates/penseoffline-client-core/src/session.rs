//! Session persistence: one bearer token plus a cached profile snapshot,
//! kept in browser-scoped storage and mirrored in memory.

use std::cell::RefCell;

use crate::error::ApiError;
use crate::profile::{Profile, Session};
use crate::storage::KeyValueStorage;

pub const TOKEN_STORAGE_KEY: &str = "pensOffline_token";
pub const USER_STORAGE_KEY: &str = "pensOffline_user";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    cache: RefCell<Session>,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// Reads both entries once. Missing or unreadable values load as absent.
    pub fn load(storage: S) -> Self {
        let cache = RefCell::new(read_session(&storage));
        Self { storage, cache }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get_session(&self) -> Session {
        self.cache.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.cache.borrow().token.clone()
    }

    pub fn user(&self) -> Option<Profile> {
        self.cache.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.cache.borrow().is_authenticated()
    }

    /// Token first, then profile. Not transactional; both writes overwrite.
    pub fn set_session(&self, token: &str, profile: Profile) -> Result<(), ApiError> {
        let serialized = serde_json::to_string(&profile)
            .map_err(|error| ApiError::storage(format!("failed to serialize profile: {error}")))?;
        {
            let mut cache = self.cache.borrow_mut();
            cache.token = Some(token.to_string());
            cache.user = Some(profile);
        }
        self.storage
            .set_item(TOKEN_STORAGE_KEY, token)
            .map_err(|error| ApiError::storage(error.to_string()))?;
        self.storage
            .set_item(USER_STORAGE_KEY, &serialized)
            .map_err(|error| ApiError::storage(error.to_string()))
    }

    /// Replaces the cached profile with a fresh server copy, keeping the token.
    pub fn update_profile(&self, profile: Profile) -> Result<(), ApiError> {
        let Some(token) = self.token() else {
            return Err(ApiError::Unauthenticated);
        };
        self.set_session(&token, profile)
    }

    pub fn clear_session(&self) -> Result<(), ApiError> {
        *self.cache.borrow_mut() = Session::default();
        self.storage
            .remove_item(TOKEN_STORAGE_KEY)
            .map_err(|error| ApiError::storage(error.to_string()))?;
        self.storage
            .remove_item(USER_STORAGE_KEY)
            .map_err(|error| ApiError::storage(error.to_string()))
    }

    /// Re-reads storage, picking up writes made by another tab.
    pub fn reload(&self) {
        *self.cache.borrow_mut() = read_session(&self.storage);
    }

    pub fn auth_header(&self) -> Result<(&'static str, String), ApiError> {
        let token = self.token().ok_or(ApiError::Unauthenticated)?;
        Ok((AUTHORIZATION_HEADER, format!("Bearer {token}")))
    }
}

fn read_session<S: KeyValueStorage>(storage: &S) -> Session {
    let token = match storage.get_item(TOKEN_STORAGE_KEY) {
        Ok(token) => token.filter(|token| !token.is_empty()),
        Err(error) => {
            tracing::warn!(%error, "failed to read session token");
            None
        }
    };
    let user = match storage.get_item(USER_STORAGE_KEY) {
        Ok(raw) => raw.and_then(|raw| decode_profile(&raw)),
        Err(error) => {
            tracing::warn!(%error, "failed to read cached profile");
            None
        }
    };
    Session { token, user }
}

fn decode_profile(raw: &str) -> Option<Profile> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => Profile::from_value(value),
        Err(error) => {
            tracing::debug!(%error, "discarding malformed cached profile");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn profile(username: &str, level: u64) -> Profile {
        Profile::from_value(json!({ "username": username, "nivel": level })).expect("profile")
    }

    #[test]
    fn empty_storage_loads_unauthenticated() {
        let store = SessionStore::load(MemoryStorage::new());
        assert_eq!(store.get_session(), Session::default());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn set_session_round_trips() {
        let store = SessionStore::load(MemoryStorage::new());
        let user = profile("x", 2);

        store.set_session("abc", user.clone()).expect("set session");

        assert_eq!(
            store.get_session(),
            Session {
                token: Some("abc".to_string()),
                user: Some(user),
            }
        );
        assert!(store.is_authenticated());
    }

    #[test]
    fn clear_session_removes_cache_and_entries() {
        let storage = MemoryStorage::new();
        let store = SessionStore::load(storage.clone());
        store.set_session("abc", profile("x", 1)).expect("set session");

        store.clear_session().expect("clear session");

        assert!(!store.is_authenticated());
        let session = store.get_session();
        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn second_store_sees_persisted_session() {
        let storage = MemoryStorage::new();
        let first = SessionStore::load(storage.clone());
        first.set_session("abc", profile("x", 4)).expect("set session");

        let second = SessionStore::load(storage);
        assert_eq!(second.token(), Some("abc".to_string()));
        assert_eq!(second.user().and_then(|user| user.level()), Some(4));
    }

    #[test]
    fn reload_picks_up_other_tab_logout() {
        let storage = MemoryStorage::new();
        let this_tab = SessionStore::load(storage.clone());
        this_tab.set_session("abc", profile("x", 1)).expect("set session");

        let other_tab = SessionStore::load(storage);
        other_tab.clear_session().expect("clear");

        assert!(this_tab.is_authenticated());
        this_tab.reload();
        assert!(!this_tab.is_authenticated());
    }

    #[test]
    fn token_without_profile_is_not_authenticated() {
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_STORAGE_KEY, "abc").expect("set");
        storage.set_item(USER_STORAGE_KEY, "null").expect("set");

        let store = SessionStore::load(storage.clone());
        assert_eq!(store.token(), Some("abc".to_string()));
        assert!(!store.is_authenticated());

        storage.set_item(USER_STORAGE_KEY, "{not json").expect("set");
        store.reload();
        assert!(store.user().is_none());
    }

    #[test]
    fn auth_header_requires_token() {
        let store = SessionStore::load(MemoryStorage::new());
        assert_eq!(store.auth_header(), Err(ApiError::Unauthenticated));

        store.set_session("abc", profile("x", 1)).expect("set session");
        assert_eq!(
            store.auth_header(),
            Ok((AUTHORIZATION_HEADER, "Bearer abc".to_string()))
        );
    }

    #[test]
    fn update_profile_keeps_token() {
        let store = SessionStore::load(MemoryStorage::new());
        assert_eq!(
            store.update_profile(profile("x", 1)),
            Err(ApiError::Unauthenticated)
        );

        store.set_session("abc", profile("x", 1)).expect("set session");
        store.update_profile(profile("x", 5)).expect("update");
        assert_eq!(store.token(), Some("abc".to_string()));
        assert_eq!(store.user().and_then(|user| user.level()), Some(5));
    }
}
