mod filesystem;
mod memory;
mod store;
mod tokens;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;
pub use store::KeyValueStore;
pub use tokens::{TokenKeys, TokenStore};
