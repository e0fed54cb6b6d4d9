//! Case- and accent-insensitive keys for headers and names.
//!
//! Normalized text is only ever used for matching; what gets displayed or
//! written back is always the original cell value.

use std::collections::HashMap;

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        other => other,
    }
}

/// Lower-case, trim and fold accented vowels. Total and idempotent.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase().chars().map(fold_accent).collect()
}

/// Column positions resolved from a header row by normalized name.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    /// Map every header to its position. When the same normalized header
    /// appears twice, the first occurrence wins.
    pub fn new(headers: &[String]) -> Self {
        let mut indices = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            indices.entry(normalize(h)).or_insert(i);
        }
        Self { indices }
    }

    /// Build the map and check that every `required` column is present.
    /// On failure returns the missing names as given by the caller.
    pub fn resolve(headers: &[String], required: &[&str]) -> Result<Self, Vec<String>> {
        let map = Self::new(headers);
        let missing: Vec<String> = required
            .iter()
            .filter(|name| map.index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() { Ok(map) } else { Err(missing) }
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.indices.get(&normalize(name)).copied()
    }

    /// Largest index among the given columns that are present.
    pub fn max_index(&self, names: &[&str]) -> usize {
        names.iter().filter_map(|n| self.index(n)).max().unwrap_or(0)
    }

    /// Cell value for `name` in `row`, trimmed; empty when absent.
    pub fn get<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.index(name)
            .and_then(|i| row.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }
}
