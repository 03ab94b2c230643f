//! Configuration management via environment variables
//!
//! All server settings come from the environment with sensible defaults,
//! so the binary runs out of the box against a local SQLite file.

/// Get an environment variable, falling back to a default value
pub fn get_env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable, parsing it to a specific type
///
/// Returns the default when the variable is unset or fails to parse.
/// A parse failure is logged as a warning rather than aborting startup.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "Environment variable '{}' has invalid value '{}', using default",
                    name,
                    raw
                );
                default
            }
        },
        Err(_) => default,
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (default: "0.0.0.0")
    pub host: String,
    /// Bind port (default: 8080)
    pub port: u16,
    /// Database URL (default: "sqlite://notes.db?mode=rwc")
    pub database_url: String,
    /// When enabled, DELETE requires a non-blank `X-Signature` header
    /// (presence-only check; the token is never verified)
    pub require_signature_on_delete: bool,
}

impl ServerConfig {
    /// Load server configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: get_env_or("NOTES_HOST", "0.0.0.0"),
            port: get_env_parse("NOTES_PORT", 8080),
            database_url: get_env_or("DATABASE_URL", "sqlite://notes.db?mode=rwc"),
            require_signature_on_delete: get_env_parse("NOTES_REQUIRE_SIGNATURE_ON_DELETE", false),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite://notes.db?mode=rwc".to_string(),
            require_signature_on_delete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_defaults() {
        std::env::remove_var("NOTES_HOST");
        std::env::remove_var("NOTES_PORT");
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("NOTES_REQUIRE_SIGNATURE_ON_DELETE");

        let config = ServerConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "sqlite://notes.db?mode=rwc");
        assert!(!config.require_signature_on_delete);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("NOTES_HOST", "127.0.0.1");
        std::env::set_var("NOTES_PORT", "9000");
        std::env::set_var("NOTES_REQUIRE_SIGNATURE_ON_DELETE", "true");

        let config = ServerConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert!(config.require_signature_on_delete);

        std::env::remove_var("NOTES_HOST");
        std::env::remove_var("NOTES_PORT");
        std::env::remove_var("NOTES_REQUIRE_SIGNATURE_ON_DELETE");
    }

    #[test]
    #[serial]
    fn test_get_env_parse_invalid_value_uses_default() {
        std::env::set_var("NOTES_PORT", "not-a-port");
        let port: u16 = get_env_parse("NOTES_PORT", 8080);
        assert_eq!(port, 8080);
        std::env::remove_var("NOTES_PORT");
    }
}
