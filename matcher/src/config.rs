//! Runtime settings, read from the process environment.

use crate::error::ConfigError;
use std::env;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com";
pub const DEFAULT_COLLECTION: &str = "resources";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub maps_api_key: Option<String>,
    pub firebase_project_id: Option<String>,
    pub firebase_api_key: Option<String>,
    pub firestore_api_base: String,
    pub collection: String,
    pub request_timeout: Duration,
    pub limits: Limits,
    pub max_body_bytes: usize,
}

/// Size bounds applied to each analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_image_bytes: usize,
    pub max_catalog_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * 1024 * 1024,
            max_catalog_bytes: 512 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let number = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(name) {
                None => Ok(default),
                Some(raw) => match raw.trim().parse::<u64>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ConfigError::InvalidNumber { name, value: raw }),
                },
            }
        };

        let defaults = Limits::default();
        let limits = Limits {
            max_image_bytes: number("MAX_IMAGE_BYTES", defaults.max_image_bytes as u64)? as usize,
            max_catalog_bytes: number("MAX_CATALOG_BYTES", defaults.max_catalog_bytes as u64)?
                as usize,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            firebase_project_id: get("FIREBASE_PROJECT_ID"),
            firebase_api_key: get("FIREBASE_API_KEY"),
            firestore_api_base: get("FIRESTORE_API_BASE")
                .unwrap_or_else(|| DEFAULT_FIRESTORE_API_BASE.to_string()),
            collection: get("RESOURCES_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            request_timeout: Duration::from_secs(number("REQUEST_TIMEOUT_SECS", 60)?),
            limits,
            max_body_bytes: number("MAX_BODY_BYTES", 16 * 1024 * 1024)? as usize,
        })
    }

    /// Names of settings whose absence will make requests fail.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gemini_api_key.is_none() {
            missing.push("GEMINI_API_KEY");
        }
        if self.maps_api_key.is_none() {
            missing.push("GOOGLE_MAPS_API_KEY");
        }
        if self.firebase_project_id.is_none() {
            missing.push("FIREBASE_PROJECT_ID");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.collection, "resources");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.limits, Limits::default());
        assert_eq!(
            config.missing_credentials(),
            vec!["GEMINI_API_KEY", "GOOGLE_MAPS_API_KEY", "FIREBASE_PROJECT_ID"]
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "g-key"),
            ("GOOGLE_MAPS_API_KEY", "m-key"),
            ("FIREBASE_PROJECT_ID", "bantu"),
            ("RESOURCES_COLLECTION", "aid"),
            ("MAX_IMAGE_BYTES", "2048"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
        assert_eq!(config.collection, "aid");
        assert_eq!(config.limits.max_image_bytes, 2048);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = config_from(&[("GEMINI_API_KEY", "  ")]).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = config_from(&[("MAX_CATALOG_BYTES", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "MAX_CATALOG_BYTES", .. }));
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "soon")]).is_err());
    }
}
