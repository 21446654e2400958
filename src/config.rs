use crate::auth::AdminPassword;
use std::env;
use std::net::SocketAddr;
use zeroize::Zeroizing;

/// Signing secrets shorter than this are accepted with a warning.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct Config {
    // Admin identity
    pub admin_password: AdminPassword,
    pub session_secret: Zeroizing<Vec<u8>>,

    // Redis
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,
    pub cookie_secure: bool,

    // Limits
    pub rate_limit_login_per_min: u32,
    pub max_items_per_project: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("admin_password", &"[REDACTED]")
            .field("session_secret", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("cookie_secure", &self.cookie_secure)
            .field("rate_limit_login_per_min", &self.rate_limit_login_per_min)
            .field("max_items_per_project", &self.max_items_per_project)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Admin password: a pre-hashed PHC string wins over plaintext
        let plaintext = env::var("ADMIN_PASSWORD").ok().map(Zeroizing::new);
        let admin_password = match env::var("ADMIN_PASSWORD_HASH") {
            Ok(hash) if !hash.is_empty() => AdminPassword::from_phc(&hash).map_err(|e| {
                ConfigError::InvalidValue("ADMIN_PASSWORD_HASH".to_string(), e.to_string())
            })?,
            _ => {
                let password = plaintext
                    .as_ref()
                    .ok_or_else(|| ConfigError::MissingVar("ADMIN_PASSWORD".to_string()))?;
                if password.is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "ADMIN_PASSWORD".to_string(),
                        "cannot be empty".to_string(),
                    ));
                }
                AdminPassword::from_plaintext(password).map_err(|e| {
                    ConfigError::InvalidValue("ADMIN_PASSWORD".to_string(), e.to_string())
                })?
            }
        };

        // Signing secret - required, never defaulted
        let session_secret = Zeroizing::new(
            env::var("SESSION_SECRET")
                .map_err(|_| ConfigError::MissingVar("SESSION_SECRET".to_string()))?
                .into_bytes(),
        );

        if session_secret.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SESSION_SECRET".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        if plaintext
            .as_ref()
            .is_some_and(|p| p.as_bytes() == session_secret.as_slice())
        {
            return Err(ConfigError::InvalidValue(
                "SESSION_SECRET".to_string(),
                "must differ from ADMIN_PASSWORD".to_string(),
            ));
        }

        if session_secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                len = session_secret.len(),
                recommended = RECOMMENDED_SECRET_LEN,
                "SESSION_SECRET is shorter than recommended"
            );
        }

        // Redis — required, the store has no implicit fallback
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        let cookie_secure = parse_env_or_default("COOKIE_SECURE", true)?;

        // Limits
        let rate_limit_login_per_min = parse_env_or_default("RATE_LIMIT_LOGIN_PER_MIN", 5)?;
        let max_items_per_project = parse_env_or_default("MAX_ITEMS_PER_PROJECT", 500)?;

        Ok(Config {
            admin_password,
            session_secret,
            redis_url,
            bind_addr,
            cookie_secure,
            rate_limit_login_per_min,
            max_items_per_project,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests run serially since they modify global env vars.
    // unwrap_or_else handles poison from prior panics.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_test_env() {
        env::remove_var("ADMIN_PASSWORD");
        env::remove_var("ADMIN_PASSWORD_HASH");
        env::remove_var("SESSION_SECRET");
        env::remove_var("REDIS_URL");
        env::remove_var("BIND_ADDR");
        env::remove_var("COOKIE_SECURE");
        env::remove_var("RATE_LIMIT_LOGIN_PER_MIN");
        env::remove_var("MAX_ITEMS_PER_PROJECT");
    }

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn set_required() {
        env::set_var("ADMIN_PASSWORD", "admin-pw");
        env::set_var("SESSION_SECRET", TEST_SECRET);
        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        env::set_var("TEST_U32", "12345");
        let result: Result<u32, ConfigError> = parse_env_or_default("TEST_U32", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_U32");
        let result: Result<u32, ConfigError> = parse_env_or_default("TEST_U32", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_config_defaults() {
        let _guard = lock_test();
        clear_test_env();
        set_required();
        env::set_var("BIND_ADDR", "0.0.0.0:3000");

        let config = Config::from_env().unwrap();

        assert!(config.admin_password.matches("admin-pw"));
        assert!(!config.admin_password.matches("other"));
        assert_eq!(config.session_secret.as_slice(), TEST_SECRET.as_bytes());
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert!(config.cookie_secure);
        assert_eq!(config.rate_limit_login_per_min, 5);
        assert_eq!(config.max_items_per_project, 500);

        clear_test_env();
    }

    #[test]
    fn test_empty_admin_password() {
        let _guard = lock_test();
        clear_test_env();
        set_required();

        // Empty rather than unset so dotenvy cannot reload a value from .env
        env::set_var("ADMIN_PASSWORD", "");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "ADMIN_PASSWORD"
        ));

        clear_test_env();
    }

    #[test]
    fn test_empty_session_secret() {
        let _guard = lock_test();
        clear_test_env();
        set_required();
        env::set_var("SESSION_SECRET", "");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "SESSION_SECRET"
        ));

        clear_test_env();
    }

    #[test]
    fn test_session_secret_must_differ_from_password() {
        let _guard = lock_test();
        clear_test_env();
        set_required();
        env::set_var("ADMIN_PASSWORD", TEST_SECRET);

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "SESSION_SECRET"
        ));

        clear_test_env();
    }

    #[test]
    fn test_short_session_secret_is_accepted() {
        let _guard = lock_test();
        clear_test_env();
        set_required();
        env::set_var("SESSION_SECRET", "short");

        let config = Config::from_env().unwrap();
        assert_eq!(config.session_secret.as_slice(), b"short");

        clear_test_env();
    }

    #[test]
    fn test_password_hash_takes_precedence() {
        let _guard = lock_test();
        clear_test_env();
        set_required();

        let phc = crate::auth::password::hash_password("hashed-pw").unwrap();
        env::set_var("ADMIN_PASSWORD_HASH", &phc);

        let config = Config::from_env().unwrap();
        assert!(config.admin_password.matches("hashed-pw"));
        assert!(!config.admin_password.matches("admin-pw"));

        clear_test_env();
    }

    #[test]
    fn test_invalid_password_hash() {
        let _guard = lock_test();
        clear_test_env();
        set_required();
        env::set_var("ADMIN_PASSWORD_HASH", "not-a-phc-string");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "ADMIN_PASSWORD_HASH"
        ));

        clear_test_env();
    }

    #[test]
    fn test_invalid_socket_addr() {
        let _guard = lock_test();
        clear_test_env();
        set_required();
        env::set_var("BIND_ADDR", "invalid_address");

        let result = Config::from_env();
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_, _)));

        clear_test_env();
    }

    #[test]
    fn test_invalid_cookie_secure() {
        let _guard = lock_test();
        clear_test_env();
        set_required();
        env::set_var("COOKIE_SECURE", "sometimes");

        let result = Config::from_env();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ParseError(ref s, _) if s == "COOKIE_SECURE"
        ));

        clear_test_env();
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let _guard = lock_test();
        clear_test_env();
        set_required();

        let config = Config::from_env().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("admin-pw"));
        assert!(!debug.contains(TEST_SECRET));
        assert!(!debug.contains("redis://"));

        clear_test_env();
    }
}
