//! The set of element symbols the lexer accepts.
//!
//! A table is filled once (see [`crate::elements`] for the loaders) and then
//! only read, so a single table can be shared by any number of scans.

use rustc_hash::FxHashMap;

/// Known element symbols, optionally with the element's name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Option<String>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from bare symbols.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(|s| (s.into(), None)).collect(),
        }
    }

    pub(crate) fn insert(&mut self, symbol: impl Into<String>, name: Option<String>) {
        self.symbols.insert(symbol.into(), name);
    }

    /// Membership test used by the lexer's longest-match scan.
    pub fn contains(&self, candidate: &str) -> bool {
        self.symbols.contains_key(candidate)
    }

    /// The element name recorded for `symbol`, if the table has one.
    pub fn name_of(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).and_then(|name| name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let table = SymbolTable::from_symbols(["H", "He"]);
        assert!(table.contains("H"));
        assert!(table.contains("He"));
        assert!(!table.contains("h"));
        assert!(!table.contains("HE"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_names() {
        let mut table = SymbolTable::new();
        assert!(table.is_empty());
        table.insert("Na", Some("Sodium".to_string()));
        table.insert("K", None);
        assert_eq!(table.name_of("Na"), Some("Sodium"));
        assert_eq!(table.name_of("K"), None);
        assert_eq!(table.name_of("Xx"), None);
    }
}
