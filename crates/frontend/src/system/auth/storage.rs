use crate::shared::storage::{KeyValueStore, TOKEN_KEY};

/// Persisted bearer token. An empty value counts as absent.
pub fn load_token(storage: &dyn KeyValueStore) -> Option<String> {
    storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
}

pub fn save_token(storage: &dyn KeyValueStore, token: &str) {
    storage.set(TOKEN_KEY, token);
}

pub fn clear_token(storage: &dyn KeyValueStore) {
    storage.remove(TOKEN_KEY);
}
