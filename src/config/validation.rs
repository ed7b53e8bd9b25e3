use crate::error::ApiError;
use std::path::Path;

/// Validates the configuration settings.
///
/// # Validation Rules
/// - Base URL cannot be empty and must carry an http(s) scheme
/// - HTTP timeout must be non-zero
/// - Per-host connection cap must be non-zero
/// - If a log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(
    base_url: &str,
    timeout_seconds: u64,
    max_connections_per_host: usize,
    log_file_path: &Option<String>,
) -> Result<(), ApiError> {
    if base_url.is_empty() {
        return Err(ApiError::config_error("API base URL cannot be empty"));
    }

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ApiError::config_error(
            "API base URL must start with http:// or https://",
        ));
    }

    if timeout_seconds == 0 {
        return Err(ApiError::config_error("HTTP timeout must be non-zero"));
    }

    if max_connections_per_host == 0 {
        return Err(ApiError::config_error(
            "Per-host connection limit must be non-zero",
        ));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(ApiError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            // Try to create the directory to validate the path
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config("https://api.example.com", 20, 3, &None).is_ok());
        assert!(validate_config("http://localhost:8080", 5, 1, &None).is_ok());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = validate_config("", 20, 3, &None);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_missing_scheme_rejected() {
        let result = validate_config("api.example.com", 20, 3, &None);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = validate_config("https://api.example.com", 0, 3, &None);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_zero_connection_cap_rejected() {
        let result = validate_config("https://api.example.com", 20, 0, &None);
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_empty_log_path_rejected() {
        let result = validate_config(
            "https://api.example.com",
            20,
            3,
            &Some(String::new()),
        );
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_log_path_in_existing_dir_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("carelink.log").to_string_lossy().to_string();
        assert!(validate_config("https://api.example.com", 20, 3, &Some(log_path)).is_ok());
    }
}
