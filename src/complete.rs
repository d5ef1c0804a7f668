//! Alias-name completion.

use tracing::debug;

use crate::table::AliasTable;

/// A copy of the alias key set that is only rebuilt when the table changed.
#[derive(Debug, Default)]
pub struct KeyCache {
    keys: Vec<String>,
    refreshes: usize,
}

impl KeyCache {
    pub fn new() -> Self {
        KeyCache::default()
    }

    /// Pulls a new key set if the table changed. Returns whether it did.
    pub fn refresh(&mut self, table: &mut AliasTable) -> bool {
        match table.snapshot_keys(true) {
            Some(keys) => {
                debug!(count = keys.len(), "alias key cache refreshed");
                self.keys = keys;
                self.refreshes += 1;
                true
            }
            None => false,
        }
    }

    pub fn complete<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keys
            .iter()
            .map(String::as_str)
            .filter(move |key| key.starts_with(prefix))
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ShellGrammar;

    #[test]
    fn test_refresh_only_on_change() {
        let mut table = AliasTable::new();
        let mut cache = KeyCache::new();

        assert!(!cache.refresh(&mut table));
        assert!(cache.keys().is_empty());

        table.define("gs", "git status", &ShellGrammar).unwrap();
        table.define("gd", "git diff", &ShellGrammar).unwrap();
        assert!(cache.refresh(&mut table));
        assert!(!cache.refresh(&mut table));
        assert_eq!(cache.refreshes(), 1);

        table.remove("gd").unwrap();
        assert!(cache.refresh(&mut table));
        assert_eq!(cache.keys().to_vec(), vec!["gs".to_string()]);
    }

    #[test]
    fn test_complete_prefix() {
        let mut table = AliasTable::new();
        table.define("gs", "git status", &ShellGrammar).unwrap();
        table.define("ll", "ls -la", &ShellGrammar).unwrap();
        table.define("gd", "git diff", &ShellGrammar).unwrap();

        let mut cache = KeyCache::new();
        cache.refresh(&mut table);

        let matches: Vec<_> = cache.complete("g").collect();
        assert_eq!(matches, vec!["gs", "gd"]);
        assert_eq!(cache.complete("").count(), 3);
        assert_eq!(cache.complete("x").count(), 0);
    }
}
