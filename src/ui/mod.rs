pub mod output;

pub use output::{display_error, display_listing, display_notifications, display_value};
