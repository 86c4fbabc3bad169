//! Server configuration from the environment.

use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database file
    pub db_path: String,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Reported by the health endpoint
    pub environment: String,
}

impl ApiConfig {
    /// Read `VET_CLINIC_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("VET_CLINIC_PORT", "5003")
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                var: "VET_CLINIC_PORT",
                reason: e.to_string(),
            })?;
        let jwt_secret =
            lookup("VET_CLINIC_JWT_SECRET").ok_or(ConfigError::Missing("VET_CLINIC_JWT_SECRET"))?;
        let cors_origins = get("VET_CLINIC_CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host: get("VET_CLINIC_HOST", "0.0.0.0"),
            port,
            db_path: get("VET_CLINIC_DB_PATH", "vet-clinic.db"),
            jwt_secret,
            cors_origins,
            environment: get("VET_CLINIC_ENV", "development"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ApiConfig::from_lookup(lookup(&[("VET_CLINIC_JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 5003);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_secret_required() {
        assert!(matches!(
            ApiConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("VET_CLINIC_JWT_SECRET"))
        ));
    }

    #[test]
    fn test_bad_port() {
        let result = ApiConfig::from_lookup(lookup(&[
            ("VET_CLINIC_JWT_SECRET", "s3cret"),
            ("VET_CLINIC_PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { var: "VET_CLINIC_PORT", .. })));
    }

    #[test]
    fn test_origin_list() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("VET_CLINIC_JWT_SECRET", "s3cret"),
            ("VET_CLINIC_CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
