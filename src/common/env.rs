// src/common/env.rs

use dotenvy::dotenv;
use lazy_static::lazy_static;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sheets,
    Memory,
}

// Holds all configuration variables for the application.
#[derive(Debug, Clone)]
pub struct Config {
    pub stage: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub bind: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub spreadsheet_id: Option<String>,
    pub sheet_name: String,
    pub access_token: Option<String>,
    pub service_account_email: Option<String>,
    pub private_key: Option<String>,
    pub sheets_api_base: String,
    pub token_uri: String,
    pub request_timeout: Duration,
    pub check_log_path: PathBuf,
    pub check_log_cap: usize,
    pub cors_origins: Vec<String>,
    // Values that were set but could not be understood.
    pub rejected: Vec<String>,
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
    accept: impl Fn(&T) -> bool,
    rejected: &mut Vec<String>,
) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) if accept(&value) => value,
        _ => {
            rejected.push(format!("{}={:?}", key, raw));
            default
        }
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Builds the config from any key lookup so parsing stays testable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut rejected = Vec::new();
        let store_backend = match var("STORE_BACKEND").map(|b| b.to_lowercase()) {
            None => StoreBackend::Sheets,
            Some(b) if b == "sheets" => StoreBackend::Sheets,
            Some(b) if b == "memory" => StoreBackend::Memory,
            Some(other) => {
                rejected.push(format!("STORE_BACKEND={:?}", other));
                StoreBackend::Sheets
            }
        };
        let port = parse_or("PORT", var("PORT"), 3000u16, |p| *p > 0, &mut rejected);
        let timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 10u64, |s| *s > 0, &mut rejected);
        let check_log_cap = parse_or("CHECK_LOG_CAP", var("CHECK_LOG_CAP"), 1000usize, |c| *c > 0, &mut rejected);

        Config {
            stage: var("STAGE").unwrap_or_else(|| "production".to_string()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_dir: var("LOG_DIR").map(PathBuf::from),
            bind: var("BIND").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            store_backend,
            spreadsheet_id: var("SPREADSHEET_ID"),
            sheet_name: var("SHEET_NAME").unwrap_or_else(|| "Whitelist".to_string()),
            access_token: var("GOOGLE_ACCESS_TOKEN"),
            service_account_email: var("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
            // Keys pasted into .env files usually carry literal "\n" sequences.
            private_key: var("GOOGLE_PRIVATE_KEY").map(|k| k.replace("\\n", "\n")),
            sheets_api_base: var("SHEETS_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string()),
            token_uri: var("GOOGLE_TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            check_log_path: var("CHECK_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs/whitelist-checks.json")),
            check_log_cap,
            cors_origins: var("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            rejected,
        }
    }

    // Problems that make the configured backend unusable.
    pub fn validate(&self) -> Result<(), String> {
        if !self.rejected.is_empty() {
            return Err(format!("unrecognized configuration: {}", self.rejected.join(", ")));
        }
        if self.store_backend == StoreBackend::Memory {
            return Ok(());
        }
        if self.spreadsheet_id.is_none() {
            return Err("SPREADSHEET_ID is required when STORE_BACKEND=sheets".to_string());
        }
        let has_service_account = self.service_account_email.is_some() && self.private_key.is_some();
        if self.access_token.is_none() && !has_service_account {
            return Err(
                "Sheets credentials missing: set GOOGLE_ACCESS_TOKEN or GOOGLE_SERVICE_ACCOUNT_EMAIL and GOOGLE_PRIVATE_KEY"
                    .to_string(),
            );
        }
        Ok(())
    }

    pub fn sheet_range(&self) -> String {
        format!("{}!A2:E", self.sheet_name)
    }
}

// Use lazy_static to create a globally accessible, read-only CONFIG instance.
lazy_static! {
    pub static ref CONFIG: Config = Config::from_env();
}

pub fn load() {
    let _ = &CONFIG.stage;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.store_backend, StoreBackend::Sheets);
        assert_eq!(cfg.sheet_range(), "Whitelist!A2:E");
        assert_eq!(cfg.check_log_cap, 1000);
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.cors_origins, vec!["*".to_string()]);
        assert_eq!(cfg.sheets_api_base, DEFAULT_SHEETS_API_BASE);
    }

    #[test]
    fn private_key_newlines_are_unescaped() {
        let cfg = config_from(&[("GOOGLE_PRIVATE_KEY", "-----BEGIN-----\\nabc\\n-----END-----")]);
        assert_eq!(cfg.private_key.as_deref(), Some("-----BEGIN-----\nabc\n-----END-----"));
    }

    #[test]
    fn sheets_backend_requires_id_and_credentials() {
        assert!(config_from(&[]).validate().is_err());
        assert!(config_from(&[("SPREADSHEET_ID", "abc")]).validate().is_err());
        assert!(config_from(&[("SPREADSHEET_ID", "abc"), ("GOOGLE_ACCESS_TOKEN", "t")])
            .validate()
            .is_ok());
        assert!(config_from(&[("STORE_BACKEND", "memory")]).validate().is_ok());
    }

    #[test]
    fn unrecognized_values_fail_validation() {
        let cfg = config_from(&[("STORE_BACKEND", "memroy"), ("PORT", "http")]);
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("STORE_BACKEND=\"memroy\""), "{}", err);
        assert!(err.contains("PORT=\"http\""), "{}", err);

        assert!(config_from(&[("STORE_BACKEND", "memory"), ("PORT", "0")]).validate().is_err());
        assert!(config_from(&[("STORE_BACKEND", "memory"), ("CHECK_LOG_CAP", "-5")]).validate().is_err());
        assert!(config_from(&[("STORE_BACKEND", "Memory"), ("PORT", "8081")]).validate().is_ok());
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let cfg = config_from(&[("CORS_ORIGINS", "https://a.example, https://b.example,")]);
        assert_eq!(cfg.cors_origins, vec!["https://a.example", "https://b.example"]);
    }
}
