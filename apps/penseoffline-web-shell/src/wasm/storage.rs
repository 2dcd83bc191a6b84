use super::*;

/// `window.localStorage`, looked up on every access.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct LocalStorage;

fn local_storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .local_storage()
        .map_err(|_| "failed to access local storage".to_string())?
        .ok_or_else(|| "local storage is unavailable".to_string())
}

impl KeyValueStorage for LocalStorage {
    type Error = String;

    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
        local_storage()?
            .get_item(key)
            .map_err(|_| format!("failed to read {key} from local storage"))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        local_storage()?
            .set_item(key, value)
            .map_err(|_| format!("failed to persist {key} to local storage"))
    }

    fn remove_item(&self, key: &str) -> Result<(), Self::Error> {
        local_storage()?
            .remove_item(key)
            .map_err(|_| format!("failed to remove {key} from local storage"))
    }
}
