use anyhow::{bail, Context};
use std::env;

const DEFAULT_DATABASE: &str = "ExpenseTracker";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug, PartialEq)]
pub enum StoreBackend {
    Mongo { uri: String, database: String },
    Memory,
}

#[derive(Clone)]
pub struct Config {
    pub auth_secret: String,
    pub store: StoreBackend,
    pub bind_address: String,
    pub port: u16,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store = match lookup("EXPENSE_STORE").as_deref() {
            None | Some("mongo") => StoreBackend::Mongo {
                uri: lookup("MONGODB_URI").context("You need to add the MONGODB_URI to the env")?,
                database: lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("unknown EXPENSE_STORE {other:?}, expected \"mongo\" or \"memory\""),
        };
        let port = match lookup("PORT") {
            Some(port) => port.parse().with_context(|| format!("invalid PORT {port:?}"))?,
            None => DEFAULT_PORT,
        };
        Ok(Config {
            auth_secret: auth_secret_from(&lookup)?,
            store,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN"),
        })
    }

    /// Only the signing secret, for issuing tokens without a full server config.
    pub fn auth_secret() -> anyhow::Result<String> {
        auth_secret_from(&|key: &str| env::var(key).ok())
    }
}

fn auth_secret_from(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    match lookup("AUTH_SECRET") {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => bail!("You need to add a non-empty AUTH_SECRET to the env"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_mongo() {
        let config = config(&[("AUTH_SECRET", "s"), ("MONGODB_URI", "mongodb://db:27017")]).unwrap();
        assert_eq!(
            config.store,
            StoreBackend::Mongo {
                uri: "mongodb://db:27017".to_string(),
                database: "ExpenseTracker".to_string(),
            }
        );
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_allowed_origin, None);
    }

    #[test]
    fn memory_store_needs_no_uri() {
        let config = config(&[
            ("AUTH_SECRET", "s"),
            ("EXPENSE_STORE", "memory"),
            ("PORT", "9000"),
            ("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
        ])
        .unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_allowed_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn rejects_missing_or_bad_values() {
        assert!(config(&[("EXPENSE_STORE", "memory")]).is_err());
        assert!(config(&[("AUTH_SECRET", ""), ("EXPENSE_STORE", "memory")]).is_err());
        assert!(config(&[("AUTH_SECRET", "s")]).is_err());
        assert!(config(&[("AUTH_SECRET", "s"), ("EXPENSE_STORE", "redis")]).is_err());
        assert!(config(&[("AUTH_SECRET", "s"), ("EXPENSE_STORE", "memory"), ("PORT", "http")]).is_err());
    }
}
