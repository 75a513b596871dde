//! Configuration management for the IKANISA MoMo server.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file is honoured through `dotenvy`, which never prints to stdout
//! (stdout carries MCP traffic).

use crate::domain::MAX_AMOUNT;
use crate::error::{ConfigError, ConfigResult};
use crate::gateway::GatewayKind;
use crate::suggestions::SuggestionEngineKind;
use std::env;

/// Configuration for the IKANISA MoMo server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Payment backend to wire in (default: mock)
    pub gateway: GatewayKind,

    /// Supabase project URL, required for the supabase gateway
    pub supabase_url: Option<String>,

    /// Supabase anon/service key, required for the supabase gateway
    pub supabase_key: Option<String>,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Largest payment amount accepted, in RWF (default: 10 000 000)
    pub max_payment_amount: u64,

    /// Correction engine for invalid codes (default: known-codes)
    pub suggestion_engine: SuggestionEngineKind,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `IKANISA_PAYMENT_GATEWAY`: `mock` or `supabase` (default: mock)
    /// - `SUPABASE_URL`: Supabase project URL (required for supabase)
    /// - `SUPABASE_ANON_KEY`: Supabase API key (required for supabase)
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `MAX_PAYMENT_AMOUNT`: Payment ceiling in RWF (default: 10000000)
    /// - `SUGGESTION_ENGINE`: `static` or `known-codes` (default: known-codes)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let gateway = match env::var("IKANISA_PAYMENT_GATEWAY") {
            Ok(val) => val.parse::<GatewayKind>().map_err(|reason| {
                ConfigError::InvalidValue {
                    var: "IKANISA_PAYMENT_GATEWAY".to_string(),
                    reason,
                }
            })?,
            Err(_) => GatewayKind::Mock,
        };

        let supabase_url = env::var("SUPABASE_URL").ok();
        let supabase_key = env::var("SUPABASE_ANON_KEY").ok();

        if gateway == GatewayKind::Supabase {
            let url = supabase_url
                .as_deref()
                .ok_or_else(|| ConfigError::MissingVar("SUPABASE_URL".to_string()))?;
            let key = supabase_key
                .as_deref()
                .ok_or_else(|| ConfigError::MissingVar("SUPABASE_ANON_KEY".to_string()))?;

            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    var: "SUPABASE_URL".to_string(),
                    reason: "Must start with http:// or https://".to_string(),
                });
            }

            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: "SUPABASE_ANON_KEY".to_string(),
                    reason: "Cannot be empty".to_string(),
                });
            }
        }

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let max_payment_amount = Self::parse_env_u64("MAX_PAYMENT_AMOUNT", MAX_AMOUNT)?;

        if max_payment_amount == 0 || max_payment_amount > MAX_AMOUNT {
            return Err(ConfigError::InvalidValue {
                var: "MAX_PAYMENT_AMOUNT".to_string(),
                reason: format!("Must be between 1 and {}", MAX_AMOUNT),
            });
        }

        let suggestion_engine = match env::var("SUGGESTION_ENGINE") {
            Ok(val) => val.parse::<SuggestionEngineKind>().map_err(|reason| {
                ConfigError::InvalidValue {
                    var: "SUGGESTION_ENGINE".to_string(),
                    reason,
                }
            })?,
            Err(_) => SuggestionEngineKind::KnownCodes,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            gateway,
            supabase_url,
            supabase_key,
            request_timeout,
            max_payment_amount,
            suggestion_engine,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gateway: GatewayKind::Mock,
            supabase_url: None,
            supabase_key: None,
            request_timeout: 10,
            max_payment_amount: MAX_AMOUNT,
            suggestion_engine: SuggestionEngineKind::KnownCodes,
            log_level: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: &[&str] = &[
        "IKANISA_PAYMENT_GATEWAY",
        "SUPABASE_URL",
        "SUPABASE_ANON_KEY",
        "REQUEST_TIMEOUT",
        "MAX_PAYMENT_AMOUNT",
        "SUGGESTION_ENGINE",
        "LOG_LEVEL",
    ];

    // Clears every config var on creation and again on drop
    struct EnvGuard;

    impl EnvGuard {
        fn new() -> Self {
            for var in VARS {
                env::remove_var(var);
            }
            EnvGuard
        }

        fn set(&self, key: &str, value: &str) {
            env::set_var(key, value);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.gateway, GatewayKind::Mock);
        assert_eq!(config.request_timeout, 10);
        assert_eq!(config.max_payment_amount, 10_000_000);
        assert_eq!(config.suggestion_engine, SuggestionEngineKind::KnownCodes);
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        let _guard = EnvGuard::new();

        let config = Config::from_env().unwrap();
        assert_eq!(config.gateway, GatewayKind::Mock);
        assert_eq!(config.max_payment_amount, MAX_AMOUNT);
    }

    #[test]
    #[serial]
    fn test_config_supabase_requires_url() {
        let guard = EnvGuard::new();
        guard.set("IKANISA_PAYMENT_GATEWAY", "supabase");
        guard.set("SUPABASE_ANON_KEY", "anon");

        match Config::from_env() {
            Err(ConfigError::MissingVar(var)) => assert_eq!(var, "SUPABASE_URL"),
            other => panic!("Expected MissingVar error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_supabase_invalid_url() {
        let guard = EnvGuard::new();
        guard.set("IKANISA_PAYMENT_GATEWAY", "supabase");
        guard.set("SUPABASE_URL", "not-a-url");
        guard.set("SUPABASE_ANON_KEY", "anon");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "SUPABASE_URL"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_supabase_valid() {
        let guard = EnvGuard::new();
        guard.set("IKANISA_PAYMENT_GATEWAY", "supabase");
        guard.set("SUPABASE_URL", "https://project.supabase.co");
        guard.set("SUPABASE_ANON_KEY", "anon-key");
        guard.set("REQUEST_TIMEOUT", "5");
        guard.set("SUGGESTION_ENGINE", "static");

        let config = Config::from_env().unwrap();
        assert_eq!(config.gateway, GatewayKind::Supabase);
        assert_eq!(
            config.supabase_url.as_deref(),
            Some("https://project.supabase.co")
        );
        assert_eq!(config.request_timeout, 5);
        assert_eq!(config.suggestion_engine, SuggestionEngineKind::Static);
    }

    #[test]
    #[serial]
    fn test_config_unknown_gateway() {
        let guard = EnvGuard::new();
        guard.set("IKANISA_PAYMENT_GATEWAY", "firebase");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => {
                assert_eq!(var, "IKANISA_PAYMENT_GATEWAY")
            }
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_amount_ceiling() {
        let guard = EnvGuard::new();
        guard.set("MAX_PAYMENT_AMOUNT", "20000000");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "MAX_PAYMENT_AMOUNT"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_parse_env_u64() {
        let guard = EnvGuard::new();
        guard.set("REQUEST_TIMEOUT", "42");
        assert_eq!(Config::parse_env_u64("REQUEST_TIMEOUT", 10).unwrap(), 42);

        guard.set("REQUEST_TIMEOUT", "not-a-number");
        assert!(Config::parse_env_u64("REQUEST_TIMEOUT", 10).is_err());

        assert_eq!(Config::parse_env_u64("NONEXISTENT_VAR_FOR_TEST", 10).unwrap(), 10);
    }
}
