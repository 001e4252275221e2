use tracing::warn;

/// Where the user is sent once no valid credential remains.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Records the redirect in the log. Suits headless callers such as the CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        warn!(route, "credentials cleared, login required");
    }
}
