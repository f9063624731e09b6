use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

const CONFIG_PATH_VAR: &str = "LURKER_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "web.config.json";
const ENV_PREFIX: &str = "LURKER__";

/// Flat, dotted-key view over `web.config.json` plus environment overrides.
///
/// `{"jwt": {"secret": "x"}}` is exposed as `jwt.secret`. Keys are matched
/// case-insensitively. `LURKER__JWT__SECRET=x` overrides the same key, and
/// `DATABASE_URL` is honoured as `database.url`.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    values: HashMap<String, String>,
}

impl Configuration {
    pub fn from_values(values: HashMap<String, String>) -> Self {
        let values = values
            .into_iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value))
            .collect();
        Self { values }
    }

    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        let mut config = if Path::new(&path).exists() {
            log::info!("Loading configuration from {}", path);
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path))?;
            Self::from_json_str(&raw)?
        } else {
            log::warn!("Configuration file {} not found, using defaults", path);
            Self::default()
        };

        config.apply_env(std::env::vars());
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let root: JsonValue = serde_json::from_str(raw).context("invalid configuration json")?;
        let mut values = HashMap::new();
        flatten("", &root, &mut values);
        Ok(Self { values })
    }

    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if name == "DATABASE_URL" {
                self.set("database.url", value);
            } else if let Some(rest) = name.strip_prefix(ENV_PREFIX) {
                let key = rest.split("__").collect::<Vec<_>>().join(".");
                self.set(&key, value);
            }
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    pub fn parse_or<T: FromStr>(&self, key: &str, fallback: T) -> T {
        match self.get(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Config value {}={} is invalid, using default", key, raw);
                fallback
            }),
            None => fallback,
        }
    }
}

fn flatten(prefix: &str, value: &JsonValue, out: &mut HashMap<String, String>) {
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map {
                let next = if prefix.is_empty() {
                    key.to_ascii_lowercase()
                } else {
                    format!("{}.{}", prefix, key.to_ascii_lowercase())
                };
                flatten(&next, child, out);
            }
        }
        JsonValue::Null => {}
        JsonValue::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
