use anyhow::Context;
use std::env;
use std::net::SocketAddr;

use crate::policy::PolicyVariant;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub policy: PolicyVariant,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("CONGESTIQ_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .context("CONGESTIQ_ADDR must be a socket address")?;

        let policy = match lookup("CONGESTIQ_POLICY") {
            Some(name) => name
                .parse()
                .with_context(|| format!("unknown CONGESTIQ_POLICY {name:?}"))?,
            None => PolicyVariant::default(),
        };

        Ok(Config { addr, policy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.policy, PolicyVariant::Congestiq);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CONGESTIQ_ADDR", "127.0.0.1:8088"),
            ("CONGESTIQ_POLICY", "split-environment"),
        ]))
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8088");
        assert_eq!(config.policy, PolicyVariant::SplitEnvironment);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(Config::from_lookup(lookup_from(&[("CONGESTIQ_ADDR", "nowhere")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CONGESTIQ_POLICY", "vibes")])).is_err());
    }
}
