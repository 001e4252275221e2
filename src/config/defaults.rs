pub fn default_base_url() -> String {
    crate::http::DEFAULT_BASE_URL.to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_log_filter() -> String {
    "info".to_string()
}
