use crate::error::Result;

/// Trait for key/value storage backends.
///
/// Values are opaque strings; callers decide what they hold.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing anything already there
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// List every stored key
    fn keys(&self) -> Result<Vec<String>>;
}
