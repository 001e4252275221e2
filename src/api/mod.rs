//! Endpoint wrappers for the TempShop backend.
//!
//! Payloads stay `serde_json::Value`; validating their shape is up to the caller.

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod shopkeeper;
