use regex::Regex;
use std::env;

/// Expand environment variables in a string using ${VAR_NAME} syntax.
///
/// Unset variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

pub fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
        return value.to_string();
    };

    re.replace_all(value, |caps: &regex::Captures<'_>| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
