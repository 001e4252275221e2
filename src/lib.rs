pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod notifications;
pub mod storage;

pub use error::{ClientError, RefreshFailure, Result};
