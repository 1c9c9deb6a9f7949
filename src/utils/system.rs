//! System utilities

use std::env;
use std::time::Duration;

/// Get environment variable value
///
/// # Returns
///
/// The value of the environment variable or empty string if not found
pub fn get_env(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// Get system proxy settings from the usual environment variables
///
/// # Returns
///
/// The system proxy server string or empty string if not found
pub fn get_system_proxy() -> String {
    let proxy_env = [
        "all_proxy",
        "ALL_PROXY",
        "http_proxy",
        "HTTP_PROXY",
        "https_proxy",
        "HTTPS_PROXY",
    ];

    for var in &proxy_env {
        let proxy = get_env(var);
        if !proxy.is_empty() {
            return proxy;
        }
    }

    String::new()
}

/// Render an elapsed time the way chat users read it.
///
/// More than seven days is shown in weeks, then days, hours, minutes,
/// and anything under a minute is "just now".
pub fn humanize_age(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 86_400) / 60;

    if days > 7 {
        format!("{} weeks ago", days / 7)
    } else if days > 0 {
        format!("{} days ago", days)
    } else if hours > 0 {
        format!("{} hours ago", hours)
    } else if minutes > 0 {
        format!("{} minutes ago", minutes)
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env() {
        // Test against a common environment variable
        let path = get_env("PATH");
        assert!(!path.is_empty());
        assert!(get_env("ANONPROXIES_SURELY_UNSET_VARIABLE").is_empty());
    }

    #[test]
    fn test_humanize_age() {
        assert_eq!(humanize_age(Duration::from_secs(30)), "just now");
        assert_eq!(humanize_age(Duration::from_secs(5 * 60 + 3)), "5 minutes ago");
        assert_eq!(humanize_age(Duration::from_secs(2 * 3600 + 59)), "2 hours ago");
        assert_eq!(humanize_age(Duration::from_secs(3 * 86_400)), "3 days ago");
        assert_eq!(humanize_age(Duration::from_secs(7 * 86_400)), "7 days ago");
        assert_eq!(humanize_age(Duration::from_secs(15 * 86_400)), "2 weeks ago");
    }
}
