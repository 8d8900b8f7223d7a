//! User metadata attached to structured messages

use crate::error::ConfigError;

/// Ordered key/value set.
///
/// Keys keep their first insertion position; setting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replace (`Some`) or remove (`None`) a key
    pub fn set(&mut self, key: &str, value: Option<&str>) -> Result<(), ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::EmptyMetadataKey);
        }
        let position = self.entries.iter().position(|(k, _)| k == key);
        match (position, value) {
            (Some(i), Some(v)) => self.entries[i].1 = v.to_string(),
            (None, Some(v)) => self.entries.push((key.to_string(), v.to_string())),
            (Some(i), None) => {
                self.entries.remove(i);
            }
            (None, None) => {}
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut md = Metadata::new();
        md.set("site", Some("a")).unwrap();
        md.set("site", Some("a")).unwrap();
        assert_eq!(md.len(), 1);
        assert_eq!(md.get("site"), Some("a"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut md = Metadata::new();
        md.set("first", Some("1")).unwrap();
        md.set("second", Some("2")).unwrap();
        md.set("first", Some("one")).unwrap();

        let keys: Vec<_> = md.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(md.get("first"), Some("one"));
    }

    #[test]
    fn test_none_removes() {
        let mut md = Metadata::new();
        md.set("a", Some("1")).unwrap();
        md.set("b", Some("2")).unwrap();
        md.set("a", None).unwrap();
        md.set("missing", None).unwrap();

        assert_eq!(md.len(), 1);
        assert_eq!(md.get("a"), None);
        assert_eq!(md.get("b"), Some("2"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut md = Metadata::new();
        assert_eq!(md.set("", Some("x")), Err(ConfigError::EmptyMetadataKey));
        assert!(md.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut md = Metadata::new();
        md.set("a", Some("1")).unwrap();
        md.clear();
        assert!(md.is_empty());
    }
}
