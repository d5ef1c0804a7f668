use tracing::warn;

use crate::config::{Settings, Truncation};
use crate::error::{AliasError, AliasResult};
use crate::expand;
use crate::grammar::CommandPosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    key: String,
    value: String,
}

impl AliasEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Aliases in definition order.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    // Sum of value lengths in bytes; sizes the expansion buffer.
    total_value_len: usize,
    changed: bool,
    settings: Settings,
}

impl AliasTable {
    pub fn new() -> Self {
        AliasTable::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        AliasTable {
            settings,
            ..AliasTable::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Defines `key`, resolving `raw_value` against the current aliases first.
    ///
    /// An existing alias with the same key is replaced and the new entry moves
    /// to the end of the table. On error the table is left untouched.
    pub fn define<P>(&mut self, key: &str, raw_value: &str, predicate: &P) -> AliasResult<()>
    where
        P: CommandPosition + ?Sized,
    {
        let value = expand::try_expand(raw_value, self, predicate)?;
        self.insert(key, value)
    }

    pub fn restore(&mut self, key: &str, value: &str) -> AliasResult<()> {
        self.insert(key, value.to_string())
    }

    fn insert(&mut self, key: &str, value: String) -> AliasResult<()> {
        if key.is_empty() {
            return Err(AliasError::InvalidKey);
        }

        let key = self.apply_limit("key", key.to_string(), self.settings.max_key_len)?;
        let value = self.apply_limit("value", value, self.settings.max_value_len)?;
        self.entries.try_reserve(1)?;

        if self.exists(&key) {
            self.remove(&key)?;
        }

        self.total_value_len += value.len();
        self.entries.push(AliasEntry { key, value });
        self.changed = true;
        Ok(())
    }

    fn apply_limit(&self, what: &'static str, text: String, max: usize) -> AliasResult<String> {
        let len = text.chars().count();
        if len <= max {
            return Ok(text);
        }

        match self.settings.truncation {
            Truncation::Reject => Err(AliasError::TooLong { what, len, max }),
            Truncation::Truncate => {
                let text = truncate_chars(&text, max).to_string();
                warn!(len, max, "alias {} truncated to '{}'", what, text);
                Ok(text)
            }
        }
    }

    fn lookup_key<'a>(&self, key: &'a str) -> &'a str {
        match self.settings.truncation {
            Truncation::Truncate => truncate_chars(key, self.settings.max_key_len),
            Truncation::Reject => key,
        }
    }

    pub fn remove(&mut self, key: &str) -> AliasResult<()> {
        let stored = self.lookup_key(key);
        let pos = self
            .entries
            .iter()
            .position(|entry| entry.key == stored)
            .ok_or_else(|| AliasError::NotFound(key.to_string()))?;

        let entry = self.entries.remove(pos);
        self.total_value_len -= entry.value.len();
        self.changed = true;
        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        let key = self.lookup_key(key);
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(AliasEntry::value)
    }

    pub fn entry(&self, key: &str) -> Option<&AliasEntry> {
        let key = self.lookup_key(key);
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    /// Does not reset the change flag.
    pub fn list_all(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }

    /// Copies of all keys in definition order.
    ///
    /// With `only_if_changed`, returns `None` when no alias was defined or
    /// removed since the previous call. Any call that returns keys clears the
    /// change flag.
    pub fn snapshot_keys(&mut self, only_if_changed: bool) -> Option<Vec<String>> {
        if only_if_changed && !self.changed {
            return None;
        }

        let keys = self.entries.iter().map(|entry| entry.key.clone()).collect();
        self.changed = false;
        Some(keys)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_value_len(&self) -> usize {
        self.total_value_len
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ShellGrammar;

    #[test]
    fn test_define_and_exists() {
        let mut table = AliasTable::new();
        assert!(!table.exists("ll"));

        table.define("ll", "ls -la", &ShellGrammar).unwrap();
        assert!(table.exists("ll"));
        assert_eq!(table.get("ll"), Some("ls -la"));
        assert_eq!(table.total_value_len(), 6);
    }

    #[test]
    fn test_redefine_replaces() {
        let mut table = AliasTable::new();
        table.define("ll", "ls -la", &ShellGrammar).unwrap();
        table.define("gs", "git status", &ShellGrammar).unwrap();
        table.define("ll", "ls -l", &ShellGrammar).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("ll"), Some("ls -l"));
        assert_eq!(table.total_value_len(), "git status".len() + "ls -l".len());

        let keys: Vec<_> = table.list_all().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["gs", "ll"]);
    }

    #[test]
    fn test_define_resolves_against_current_table() {
        let mut table = AliasTable::new();
        table.define("a", "b", &ShellGrammar).unwrap();
        table.define("b", "c", &ShellGrammar).unwrap();
        table.define("x", "a", &ShellGrammar).unwrap();

        assert_eq!(table.get("a"), Some("b"));
        assert_eq!(table.get("b"), Some("c"));
        assert_eq!(table.get("x"), Some("c"));
    }

    #[test]
    fn test_remove() {
        let mut table = AliasTable::new();
        table.define("ll", "ls -la", &ShellGrammar).unwrap();

        assert!(table.remove("ll").is_ok());
        assert!(!table.exists("ll"));
        assert_eq!(table.total_value_len(), 0);
    }

    #[test]
    fn test_remove_missing_leaves_table() {
        let mut table = AliasTable::new();
        table.define("ll", "ls -la", &ShellGrammar).unwrap();
        table.snapshot_keys(false);

        let err = table.remove("nope").unwrap_err();
        assert!(matches!(err, AliasError::NotFound(ref key) if key == "nope"));
        assert_eq!(err.to_string(), "no such alias key: nope");
        assert_eq!(table.len(), 1);
        assert!(table.snapshot_keys(true).is_none());
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut table = AliasTable::new();
        let err = table.define("", "ls", &ShellGrammar).unwrap_err();
        assert!(matches!(err, AliasError::InvalidKey));
        assert!(table.is_empty());
    }

    #[test]
    fn test_snapshot_keys_tracks_changes() {
        let mut table = AliasTable::new();
        table.define("a", "1", &ShellGrammar).unwrap();
        table.define("b", "2", &ShellGrammar).unwrap();

        assert_eq!(
            table.snapshot_keys(true),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(table.snapshot_keys(true), None);

        // Unconditional snapshots always answer.
        assert_eq!(table.snapshot_keys(false).map(|keys| keys.len()), Some(2));

        table.remove("a").unwrap();
        assert_eq!(table.snapshot_keys(true), Some(vec!["b".to_string()]));
        assert_eq!(table.snapshot_keys(true), None);
    }

    #[test]
    fn test_list_all_keeps_change_flag() {
        let mut table = AliasTable::new();
        table.define("a", "1", &ShellGrammar).unwrap();
        assert_eq!(table.list_all().count(), 1);
        assert!(table.snapshot_keys(true).is_some());
    }

    #[test]
    fn test_truncation() {
        let settings = Settings {
            max_key_len: 3,
            max_value_len: 4,
            ..Settings::default()
        };
        let mut table = AliasTable::with_settings(settings);
        table.define("abcdef", "123456", &ShellGrammar).unwrap();

        assert!(table.exists("abc"));
        assert_eq!(table.get("abc"), Some("1234"));
        assert_eq!(table.total_value_len(), 4);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let settings = Settings {
            max_value_len: 2,
            ..Settings::default()
        };
        let mut table = AliasTable::with_settings(settings);
        table.restore("e", "ééé").unwrap();
        assert_eq!(table.get("e"), Some("éé"));
    }

    #[test]
    fn test_truncated_key_found_by_full_name() {
        let mut table = AliasTable::new();
        let long = "k".repeat(60);
        table.define(&long, "x", &ShellGrammar).unwrap();

        assert!(table.exists(&long));
        assert!(table.exists(&"k".repeat(50)));
        assert_eq!(table.get(&long), Some("x"));

        assert!(table.remove(&long).is_ok());
        assert!(table.is_empty());
        assert!(!table.exists(&long));
    }

    #[test]
    fn test_reject_policy_does_not_cut_lookups() {
        let settings = Settings {
            max_key_len: 3,
            truncation: Truncation::Reject,
            ..Settings::default()
        };
        let mut table = AliasTable::with_settings(settings);
        table.define("abc", "x", &ShellGrammar).unwrap();

        assert!(!table.exists("abcdef"));
        assert!(matches!(table.remove("abcdef"), Err(AliasError::NotFound(_))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_reject_policy() {
        let settings = Settings {
            max_key_len: 3,
            truncation: Truncation::Reject,
            ..Settings::default()
        };
        let mut table = AliasTable::with_settings(settings);
        let err = table.define("abcdef", "x", &ShellGrammar).unwrap_err();

        assert!(matches!(err, AliasError::TooLong { what: "key", len: 6, max: 3 }));
        assert!(table.is_empty());
        assert!(table.snapshot_keys(true).is_none());
    }

    #[test]
    fn test_redefined_key_truncated_before_overwrite() {
        let settings = Settings {
            max_key_len: 2,
            ..Settings::default()
        };
        let mut table = AliasTable::with_settings(settings);
        table.define("ab", "1", &ShellGrammar).unwrap();
        table.define("abc", "2", &ShellGrammar).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("ab"), Some("2"));
    }
}
