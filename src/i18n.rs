use indexmap::IndexMap;
use log::warn;
use std::path::Path;

use crate::error::{Result, SyncLensError};

/// Key to user-facing text lookup.
///
/// Implementations return the key itself for unknown ids so callers always
/// have something to render.
pub trait MessageCatalog {
    fn lookup(&self, key: &str) -> String;
}

const ENGLISH: &[(&str, &str)] = &[
    ("errorView.unknown", "Unknown error"),
    ("sources.additionalFailureInfo", "Additional failure info"),
    ("form.someError", "Oops! Something went wrong..."),
    ("jobs.title", "Jobs"),
    ("jobs.noJobs", "No jobs found."),
    ("jobs.lastFailure", "Last failure"),
    ("users.title", "Users"),
    ("users.noUsers", "No users found."),
    ("sources.created", "Source created"),
    ("sources.jobLogs", "Check logs"),
    (
        "sources.fetchingConnectorError",
        "Failed to load the connector specification",
    ),
];

/// Ordered message catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: IndexMap<String, String>,
}

impl Catalog {
    /// Built-in English messages.
    pub fn english() -> Self {
        ENGLISH.iter().copied().collect()
    }

    /// Loads a flat `key = message` file and overlays it on the English
    /// messages. The format is picked from the extension (json, yaml/yml,
    /// toml).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;

        let overrides: IndexMap<String, String> =
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => serde_json::from_str(&contents)?,
                Some("yaml" | "yml") => serde_yaml::from_str(&contents).map_err(|e| {
                    SyncLensError::Config(format!("Invalid messages file {}: {e}", path.display()))
                })?,
                Some("toml") => toml::from_str(&contents).map_err(|e| {
                    SyncLensError::Config(format!("Invalid messages file {}: {e}", path.display()))
                })?,
                _ => {
                    return Err(SyncLensError::Config(format!(
                        "Unsupported messages file format: {}",
                        path.display()
                    )))
                }
            };

        let mut catalog = Self::english();
        catalog.messages.extend(overrides);
        Ok(catalog)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            messages: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl MessageCatalog for Catalog {
    fn lookup(&self, key: &str) -> String {
        if let Some(message) = self.get(key) {
            message.to_string()
        } else {
            warn!("Missing message for id \"{key}\", using id as fallback");
            key.to_string()
        }
    }
}
