use super::store::KeyValueStore;
use crate::error::Result;
use std::sync::Arc;

/// Storage keys for one role's bearer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenKeys {
    pub access: String,
    pub refresh: String,
}

impl TokenKeys {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    pub fn customer() -> Self {
        Self::new("access_token", "refresh_token")
    }

    pub fn shopkeeper() -> Self {
        Self::new("shopkeeper_access_token", "shopkeeper_refresh_token")
    }
}

/// The access/refresh pair of a single role, persisted under fixed keys.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
    keys: TokenKeys,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: TokenKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    pub fn access(&self) -> Result<Option<String>> {
        Ok(self.store.get(&self.keys.access)?.filter(|t| !t.is_empty()))
    }

    pub fn refresh(&self) -> Result<Option<String>> {
        Ok(self.store.get(&self.keys.refresh)?.filter(|t| !t.is_empty()))
    }

    /// Replace the whole pair. A pair without a refresh token drops the old one.
    pub fn save_pair(&self, access: &str, refresh: Option<&str>) -> Result<()> {
        self.store.set(&self.keys.access, access)?;
        match refresh {
            Some(refresh) => self.store.set(&self.keys.refresh, refresh),
            None => self.store.remove(&self.keys.refresh),
        }
    }

    pub fn set_access(&self, access: &str) -> Result<()> {
        self.store.set(&self.keys.access, access)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.keys.access)?;
        self.store.remove(&self.keys.refresh)
    }

    pub fn has_credentials(&self) -> Result<bool> {
        Ok(self.access()?.is_some() || self.refresh()?.is_some())
    }
}
