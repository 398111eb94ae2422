//! The `ConfigLookup` capability and its two representations.

use rustc_hash::FxHashMap;

use crate::ConfigValue;

/// Shared read-only `true`, returned for bare flags in an [`AssocList`].
static FLAG_SET: ConfigValue = ConfigValue::Bool(true);

/// Read-only key/value lookup over a job's configuration.
///
/// Implementors only provide `get`; the typed helpers are derived from it.
pub trait ConfigLookup {
    /// Look up the value stored under `key`.
    fn get(&self, key: &str) -> Option<&ConfigValue>;

    /// Look up `key`, falling back to `default` when absent.
    fn get_or<'a>(&'a self, key: &str, default: &'a ConfigValue) -> &'a ConfigValue {
        self.get(key).unwrap_or(default)
    }

    /// Whether `key` is present at all.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Read a boolean option. Non-boolean values count as absent.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(ConfigValue::as_bool).unwrap_or(default)
    }

    /// Read a string option. Non-string values count as absent.
    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }
}

/// One entry of an [`AssocList`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigEntry {
    /// A bare key whose presence means `true`.
    Flag(String),
    /// A key with an explicit value.
    Pair(String, ConfigValue),
}

impl ConfigEntry {
    fn key(&self) -> &str {
        match self {
            ConfigEntry::Flag(key) | ConfigEntry::Pair(key, _) => key,
        }
    }
}

/// Ordered association-list configuration.
///
/// Lookup returns the first entry whose key matches, so entries pushed
/// earlier shadow later ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssocList {
    entries: Vec<ConfigEntry>,
}

impl AssocList {
    pub fn new() -> Self {
        AssocList {
            entries: Vec::new(),
        }
    }

    /// Append a bare flag.
    #[must_use]
    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.entries.push(ConfigEntry::Flag(key.into()));
        self
    }

    /// Append a key/value pair.
    #[must_use]
    pub fn pair(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.entries.push(ConfigEntry::Pair(key.into(), value.into()));
        self
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }
}

impl FromIterator<ConfigEntry> for AssocList {
    fn from_iter<I: IntoIterator<Item = ConfigEntry>>(iter: I) -> Self {
        AssocList {
            entries: iter.into_iter().collect(),
        }
    }
}

impl ConfigLookup for AssocList {
    fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|entry| entry.key() == key)
            .map(|entry| match entry {
                ConfigEntry::Flag(_) => &FLAG_SET,
                ConfigEntry::Pair(_, value) => value,
            })
    }
}

/// Hash-map configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapConfig {
    values: FxHashMap<String, ConfigValue>,
}

impl MapConfig {
    pub fn new() -> Self {
        MapConfig {
            values: FxHashMap::default(),
        }
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`MapConfig::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigLookup for MapConfig {
    fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }
}
