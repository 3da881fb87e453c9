use std::collections::HashMap;
use std::env;
use std::fs;

use crate::error::{BotError, BotResult};

pub const DEFAULT_RUN_MODE: &str = "cli";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> BotResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("Cannot read {}: {}", path, e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> BotResult<Self> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(BotError::Config(format!(
                    "Invalid config line {}: {}",
                    idx + 1,
                    line
                )));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }

    pub fn require(&self, key: &str) -> BotResult<String> {
        self.lookup(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BotError::Config(format!("{} must be set", key)))
    }

    pub fn run_mode(&self) -> String {
        self.lookup("RUN_MODE")
            .unwrap_or_else(|| DEFAULT_RUN_MODE.to_string())
    }

    pub fn port(&self) -> BotResult<u16> {
        match self.lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| BotError::Config(format!("Invalid PORT: {}", raw))),
            None => Ok(DEFAULT_PORT),
        }
    }

    pub fn bind_address(&self) -> String {
        self.lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
    }
}
