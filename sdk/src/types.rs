use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;

/// A typed property value parsed from a configuration file.
///
/// The closed variant keeps the syntactic type of the literal, so a port
/// number stays a number and a quoted `"123"` stays a string all the way to
/// the serialized response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl PropertyValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One parsed candidate file: a logical name (its repository-relative path)
/// plus the insertion-ordered mapping of dotted keys to values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySource {
    pub name: String,
    pub source: IndexMap<String, PropertyValue>,
}

impl PropertySource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.source.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// A candidate that was located but could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedSource {
    pub name: String,
    pub reason: String,
}

/// The ordered result of a resolution: sources earlier in the list win on
/// key conflicts when a consumer flattens them. The engine itself never
/// merges keys.
///
/// `failures` carries per-source parse failures so a malformed overlay is
/// visible to the caller instead of silently dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub sources: Vec<PropertySource>,
    pub failures: Vec<FailedSource>,
}

impl Resolution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.failures.is_empty()
    }

    /// Names of the resolved sources, in precedence order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}

/// A raw file resolved through the profile/application layers, byte-exact.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFile {
    pub body: Bytes,
    pub content_type: &'static str,
}
