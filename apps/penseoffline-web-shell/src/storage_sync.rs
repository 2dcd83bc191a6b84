//! Which cross-tab `storage` events require a session reload.

use penseoffline_client_core::session::TOKEN_STORAGE_KEY;

/// Another tab logging in or out rewrites the token entry; a `None` key
/// means that tab cleared storage entirely. The user entry always changes
/// together with the token, so it is not watched on its own.
pub(crate) fn should_reload_session(changed_key: Option<&str>) -> bool {
    changed_key.is_none_or(|key| key == TOKEN_STORAGE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use penseoffline_client_core::session::USER_STORAGE_KEY;

    #[test]
    fn token_changes_and_full_clears_reload() {
        assert!(should_reload_session(Some(TOKEN_STORAGE_KEY)));
        assert!(should_reload_session(None));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert!(!should_reload_session(Some(USER_STORAGE_KEY)));
        assert!(!should_reload_session(Some("theme")));
        assert!(!should_reload_session(Some("")));
    }
}
