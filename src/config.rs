//! Property based configuration.
//!
//! Properties are read from a flat JSON object, for example
//! `{"RINEX_version": "3.01", "RINEX_week_rollover": 2048}`,
//! and may be overridden in memory (command line).
//! Overrides always take precedence over file values.
use std::{collections::HashMap, path::Path, str::FromStr};

use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration file must contain a JSON object")]
    NotAnObject,
    #[error("invalid property \"{0}\": expecting KEY=VALUE")]
    InvalidProperty(String),
}

#[derive(Debug, Default, Clone)]
pub struct Configuration {
    /// Properties loaded from file
    file: HashMap<String, String>,
    /// In memory overrides
    overridden: HashMap<String, String>,
}

/// Converts a JSON value to its property (string) representation
fn to_property(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl FromStr for Configuration {
    type Err = Error;

    /// Parses a JSON object of properties
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let value = serde_json::from_str::<Value>(content)?;

        let object = value.as_object().ok_or(Error::NotAnObject)?;

        let file = object
            .iter()
            .map(|(key, value)| (key.to_string(), to_property(value)))
            .collect();

        Ok(Self {
            file,
            overridden: Default::default(),
        })
    }
}

impl Configuration {
    /// Loads properties from file
    pub fn try_from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let cfg = Self::from_str(&content)?;
        debug!(
            "configuration file \"{}\" opened with no errors ({} properties)",
            path.display(),
            cfg.file.len()
        );
        Ok(cfg)
    }

    /// Loads properties from file. An unreadable or invalid file
    /// is not fatal: it is reported and we proceed with defaults.
    pub fn from_file(path: &Path) -> Self {
        match Self::try_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("{}: {} - using default values", path.display(), e);
                Self::default()
            },
        }
    }

    /// Overrides (or defines) a property
    pub fn set_property(&mut self, name: &str, value: &str) {
        self.overridden.insert(name.to_string(), value.to_string());
    }

    /// Overrides a property from a `KEY=VALUE` description
    pub fn set_key_value(&mut self, description: &str) -> Result<(), Error> {
        let (key, value) = description
            .split_once('=')
            .ok_or_else(|| Error::InvalidProperty(description.to_string()))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidProperty(description.to_string()));
        }

        self.set_property(key, value.trim());
        Ok(())
    }

    /// True if this property is defined, either overridden or from file
    pub fn is_present(&self, name: &str) -> bool {
        self.overridden.contains_key(name) || self.file.contains_key(name)
    }

    /// Raw property value
    pub fn raw_property(&self, name: &str) -> Option<&str> {
        self.overridden
            .get(name)
            .or_else(|| self.file.get(name))
            .map(|s| s.as_str())
    }

    /// String property, `default` when not defined
    pub fn string_property(&self, name: &str, default: &str) -> String {
        self.raw_property(name).unwrap_or(default).to_string()
    }

    /// Typed property. Returns `default` when the property is not
    /// defined or cannot be interpreted.
    pub fn property<T: FromStr>(&self, name: &str, default: T) -> T {
        match self.raw_property(name) {
            Some(value) => match value.trim().parse::<T>() {
                Ok(value) => value,
                Err(_) => {
                    warn!("invalid value \"{}\" for \"{}\" - using default", value, name);
                    default
                },
            },
            None => default,
        }
    }

    /// Optional string property, empty values being considered as not defined
    pub fn optional_property(&self, name: &str) -> Option<String> {
        let value = self.raw_property(name)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}
