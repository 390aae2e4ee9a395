//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Read a string variable, treating unset and blank values alike.
pub fn env_string(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Read a string variable or fall back to `default`.
pub fn env_string_or(var: &str, default: &str) -> String {
    env_string(var).unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "CHATVEC_TEST_ENV_PARSE_VALID_41873";
        // SAFETY: unique variable name, no other thread reads it.
        unsafe { std::env::set_var(var_name, "42") };
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 42);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "CHATVEC_TEST_ENV_PARSE_INVALID_41874";
        unsafe { std::env::set_var(var_name, "banana") };
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "CHATVEC_TEST_ENV_PARSE_MISSING_41875";
        unsafe { std::env::remove_var(var_name) };
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_string_blank_is_unset() {
        let var_name = "CHATVEC_TEST_ENV_STRING_BLANK_41876";
        unsafe { std::env::set_var(var_name, "   ") };
        assert_eq!(env_string(var_name), None);
        assert_eq!(env_string_or(var_name, "fallback"), "fallback");
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_string_trims_value() {
        let var_name = "CHATVEC_TEST_ENV_STRING_TRIM_41877";
        unsafe { std::env::set_var(var_name, "  dlt_dev ") };
        assert_eq!(env_string(var_name).as_deref(), Some("dlt_dev"));
        unsafe { std::env::remove_var(var_name) };
    }
}
