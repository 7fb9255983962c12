/// Get environment variable with EVENTDRIPPER_ prefix, falling back to unprefixed version
///
/// Checks `EVENTDRIPPER_{key}` first, then `{key}`.
///
/// # Examples
///
/// ```rust,ignore
/// // Checks EVENTDRIPPER_API_KEY first, then API_KEY
/// let api_key = get_env_with_prefix("API_KEY");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("EVENTDRIPPER_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
