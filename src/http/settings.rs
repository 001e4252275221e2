use crate::storage::TokenStore;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const CSRF_PATH: &str = "/auth/csrf/";
pub const TOKEN_REFRESH_PATH: &str = "/auth/token/refresh/";
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Paths that answer 401 for bad credentials rather than expired ones.
pub const CUSTOMER_EXCLUDED_PATHS: &[&str] = &[
    "/auth/login/",
    "/auth/register/",
    "/auth/logout/",
    "/auth/token/refresh/",
    "/auth/token/verify/",
    "/auth/profile/",
    "/auth/csrf/",
];

pub const SHOPKEEPER_EXCLUDED_PATHS: &[&str] = &[
    "/shopkeeper/login/",
    "/shopkeeper/register/",
    "/auth/token/refresh/",
];

/// Customer resources whose 401s are worth a session refresh.
pub const CUSTOMER_PROTECTED_PREFIXES: &[&str] = &[
    "/cart/",
    "/auth/orders/",
    "/auth/addresses/",
    "/auth/wallet/",
    "/auth/payment-methods/",
    "/auth/reviews/",
    "/auth/wishlist/",
];

/// How a client proves who it is.
#[derive(Clone)]
pub enum AuthMode {
    /// Server-managed session cookie; the CSRF cookie is echoed on mutating requests.
    CookieSession {
        csrf_cookie: String,
        csrf_header: String,
    },
    /// Access/refresh pair held in local storage.
    Bearer(TokenStore),
}

impl AuthMode {
    pub fn cookie_session() -> Self {
        AuthMode::CookieSession {
            csrf_cookie: CSRF_COOKIE.to_string(),
            csrf_header: CSRF_HEADER.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Label used in logs.
    pub name: String,
    pub refresh_path: String,
    pub excluded_paths: Vec<String>,
    /// `None` makes every non-excluded path eligible for refresh.
    pub protected_prefixes: Option<Vec<String>>,
    pub login_route: String,
}

impl ClientSettings {
    pub fn customer_session() -> Self {
        Self {
            name: "customer-session".to_string(),
            refresh_path: TOKEN_REFRESH_PATH.to_string(),
            excluded_paths: to_strings(CUSTOMER_EXCLUDED_PATHS),
            protected_prefixes: Some(to_strings(CUSTOMER_PROTECTED_PREFIXES)),
            login_route: "/login".to_string(),
        }
    }

    pub fn customer_bearer() -> Self {
        Self {
            name: "customer".to_string(),
            refresh_path: TOKEN_REFRESH_PATH.to_string(),
            excluded_paths: to_strings(CUSTOMER_EXCLUDED_PATHS),
            protected_prefixes: None,
            login_route: "/login".to_string(),
        }
    }

    pub fn shopkeeper() -> Self {
        Self {
            name: "shopkeeper".to_string(),
            refresh_path: TOKEN_REFRESH_PATH.to_string(),
            excluded_paths: to_strings(SHOPKEEPER_EXCLUDED_PATHS),
            protected_prefixes: None,
            login_route: "/shopkeeper".to_string(),
        }
    }

    pub fn is_excluded(&self, route: &str) -> bool {
        self.excluded_paths.iter().any(|p| route.starts_with(p.as_str()))
    }

    pub fn is_protected(&self, route: &str) -> bool {
        match &self.protected_prefixes {
            Some(prefixes) => prefixes.iter().any(|p| route.starts_with(p.as_str())),
            None => true,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_session_eligibility() {
        let settings = ClientSettings::customer_session();
        assert!(settings.is_protected("/cart/"));
        assert!(settings.is_protected("/auth/wishlist/product/4/"));
        assert!(!settings.is_protected("/products/"));
        assert!(settings.is_excluded("/auth/login/"));
        assert!(settings.is_excluded("/auth/profile/"));
        assert!(!settings.is_excluded("/auth/orders/"));
    }

    #[test]
    fn test_bearer_protects_everything_not_excluded() {
        let settings = ClientSettings::shopkeeper();
        assert!(settings.is_protected("/shopkeeper/dashboard/"));
        assert!(settings.is_excluded("/shopkeeper/login/"));
        assert_eq!(settings.login_route, "/shopkeeper");
    }
}
