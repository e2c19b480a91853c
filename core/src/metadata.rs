//! Standalone metadata pairs.
//!
//! Metadata is an ordered list of unique `{key, value}` pairs. Keys are
//! lowercase names with an optional DNS-style prefix (`prefix/name`);
//! values are lowercase and may be empty.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Maximum length of a key name and of a value.
pub const METADATA_NAME_MAX_LEN: usize = 63;

/// Maximum length of a key prefix.
pub const METADATA_PREFIX_MAX_LEN: usize = 253;

const NAME_PATTERN: &str = r"^[a-z0-9]([a-z0-9._-]*[a-z0-9])?$";
const PREFIX_PATTERN: &str = r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$";

fn name_matches(text: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

fn prefix_matches(text: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PREFIX_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// Metadata format violations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("invalid metadata key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("invalid metadata value {value:?} for key {key:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("duplicate metadata key {0:?}")]
    DuplicateKey(String),
}

/// A single metadata pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataPair {
    pub key: String,
    pub value: String,
}

impl MetadataPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Check key and value format.
    pub fn validate(&self) -> Result<(), MetadataError> {
        validate_key(&self.key)?;
        validate_value(&self.key, &self.value)
    }
}

fn validate_key(key: &str) -> Result<(), MetadataError> {
    let invalid = |reason: &str| MetadataError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        if prefix.is_empty() || prefix.len() > METADATA_PREFIX_MAX_LEN {
            return Err(invalid("prefix must be 1-253 characters"));
        }
        if !prefix_matches(prefix) {
            return Err(invalid("prefix must be a lowercase DNS subdomain"));
        }
    }

    if name.is_empty() || name.len() > METADATA_NAME_MAX_LEN {
        return Err(invalid("name must be 1-63 characters"));
    }
    if !name_matches(name) {
        return Err(invalid(
            "name must be lowercase alphanumerics, '-', '_' or '.', starting and ending with an alphanumeric",
        ));
    }
    Ok(())
}

fn validate_value(key: &str, value: &str) -> Result<(), MetadataError> {
    if value.is_empty() {
        return Ok(());
    }
    let invalid = |reason: &str| MetadataError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    if value.len() > METADATA_NAME_MAX_LEN {
        return Err(invalid("value must be at most 63 characters"));
    }
    if !name_matches(value) {
        return Err(invalid("value must be lowercase alphanumerics, '-', '_' or '.'"));
    }
    Ok(())
}

/// Ordered list of metadata pairs with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata(Vec<MetadataPair>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs, validating format and key uniqueness.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, MetadataError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let metadata = Self(
            pairs
                .into_iter()
                .map(|(k, v)| MetadataPair::new(k, v))
                .collect(),
        );
        metadata.validate()?;
        Ok(metadata)
    }

    /// Check every pair and reject duplicate keys.
    pub fn validate(&self) -> Result<(), MetadataError> {
        let mut seen = std::collections::HashSet::new();
        for pair in &self.0 {
            pair.validate()?;
            if !seen.insert(pair.key.as_str()) {
                return Err(MetadataError::DuplicateKey(pair.key.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn pairs(&self) -> &[MetadataPair] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataPair> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, pair) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", pair.key, pair.value)?;
        }
        write!(f, "}}")
    }
}
