pub mod client;
pub mod navigator;
pub mod refresh;
pub mod request;
pub mod settings;
pub mod transport;

pub use client::AuthClient;
pub use navigator::{LogNavigator, Navigator};
pub use refresh::{RefreshCoordinator, RefreshOutcome};
pub use request::{ApiRequest, ApiResponse, FormData, FormPart};
pub use settings::{AuthMode, ClientSettings, DEFAULT_BASE_URL};
pub use transport::{ReqwestTransport, Transport};
