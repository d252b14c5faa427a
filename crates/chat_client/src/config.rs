//! Client startup settings read from the environment.

use std::time::Duration;

use chat_sync::config::env_string_opt;
use reply_source_simulated::SIMULATED_SOURCE_ID;

pub const REPLY_SOURCE_ENV_VAR: &str = "CHAT_CLIENT_REPLY_SOURCE";
pub const ENDPOINT_ENV_VAR: &str = "CHAT_CLIENT_ENDPOINT";
pub const TIMEOUT_ENV_VAR: &str = "CHAT_CLIENT_TIMEOUT_SEC";
pub const DISPLAY_NAME_ENV_VAR: &str = "CHAT_CLIENT_DISPLAY_NAME";

pub const DEFAULT_SOURCE_ID: &str = SIMULATED_SOURCE_ID;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub source_id: String,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
    pub display_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            source_id: DEFAULT_SOURCE_ID.to_string(),
            endpoint: None,
            timeout: None,
            display_name: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let timeout = match env_string_opt(TIMEOUT_ENV_VAR) {
            Some(raw) => Some(parse_timeout_sec(&raw)?),
            None => None,
        };

        Ok(Self {
            source_id: env_string_opt(REPLY_SOURCE_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_SOURCE_ID.to_string()),
            endpoint: env_string_opt(ENDPOINT_ENV_VAR),
            timeout,
            display_name: env_string_opt(DISPLAY_NAME_ENV_VAR),
        })
    }
}

/// Parses a whole number of seconds greater than zero.
pub fn parse_timeout_sec(raw: &str) -> Result<Duration, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(format!("{TIMEOUT_ENV_VAR} must be > 0")),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
        Err(_) => Err(format!(
            "{TIMEOUT_ENV_VAR} must be a positive number of seconds, got '{}'",
            raw.trim()
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::{Mutex, OnceLock};

    use pretty_assertions::assert_eq;

    use super::*;

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn defaults_select_simulated_source() {
        let _lock = env_lock();
        let _g1 = set_env_guard(REPLY_SOURCE_ENV_VAR, None);
        let _g2 = set_env_guard(ENDPOINT_ENV_VAR, None);
        let _g3 = set_env_guard(TIMEOUT_ENV_VAR, Some("  "));
        let _g4 = set_env_guard(DISPLAY_NAME_ENV_VAR, None);

        assert_eq!(ClientConfig::from_env(), Ok(ClientConfig::default()));
    }

    #[test]
    fn remote_settings_are_read() {
        let _lock = env_lock();
        let _g1 = set_env_guard(REPLY_SOURCE_ENV_VAR, Some("remote"));
        let _g2 = set_env_guard(ENDPOINT_ENV_VAR, Some(" http://localhost:8000/chat "));
        let _g3 = set_env_guard(TIMEOUT_ENV_VAR, Some("30"));
        let _g4 = set_env_guard(DISPLAY_NAME_ENV_VAR, Some("Alice"));

        assert_eq!(
            ClientConfig::from_env(),
            Ok(ClientConfig {
                source_id: "remote".to_string(),
                endpoint: Some("http://localhost:8000/chat".to_string()),
                timeout: Some(Duration::from_secs(30)),
                display_name: Some("Alice".to_string()),
            })
        );
    }

    #[test]
    fn invalid_timeout_is_a_startup_error() {
        let _lock = env_lock();
        let _g1 = set_env_guard(TIMEOUT_ENV_VAR, Some("0"));

        let error = ClientConfig::from_env().expect_err("zero timeout");
        assert!(error.contains("must be > 0"));
    }

    #[test]
    fn timeout_rejects_non_numbers() {
        assert!(parse_timeout_sec("soon").is_err());
        assert!(parse_timeout_sec("-5").is_err());
        assert_eq!(parse_timeout_sec(" 12 "), Ok(Duration::from_secs(12)));
    }
}
