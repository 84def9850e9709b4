//! Category-mode axis labeling.

/// Insertion-ordered map of axis positions to label strings.
///
/// When category mode is enabled for an axis the numeric tick generator is
/// bypassed and these entries are used verbatim; iteration order is
/// insertion order.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryMap {
    entries: Vec<(f64, String)>,
}

impl CategoryMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an axis position / label pair.
    pub fn add_item(&mut self, value: f64, label: impl Into<String>) {
        self.entries.push((value, label.into()));
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &str)> {
        self.entries.iter().map(|(v, s)| (*v, s.as_str()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/categories.rs"]
mod tests;
