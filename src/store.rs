//! The token store: category name → identifier → token, persisted as a
//! JSON snapshot between runs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::CanonicalToken;

/// One category's tokens, keyed by normalized identifier.
pub type CategoryTokens = BTreeMap<String, TokenEntry>;

/// Partial result returned by one extraction step, merged into the store
/// by the engine once the step completes.
pub type PartialTokens = BTreeMap<String, CategoryTokens>;

/// A category entry: either a token or a named group of tokens
/// (style-bound categories may nest one level, e.g. `colors.light.primary`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenEntry {
    Token(CanonicalToken),
    Group(BTreeMap<String, CanonicalToken>),
}

/// In-memory token store, shaped exactly like the persisted snapshot.
///
/// Keys iterate in sorted order as a property of the map type, but
/// consumers of the snapshot must not rely on key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenStore {
    categories: BTreeMap<String, CategoryTokens>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with an empty map per category, so a pass that
    /// finds nothing for a category still records it in the snapshot.
    pub fn with_categories<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = names
            .into_iter()
            .map(|name| (name.into(), CategoryTokens::new()))
            .collect();
        Self { categories }
    }

    pub fn load(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    /// Serialize with stable 2-space indentation.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialize()?)?;
        Ok(())
    }

    pub fn ensure_category(&mut self, name: &str) {
        self.categories.entry(name.to_string()).or_default();
    }

    /// Replace the named category's entire sub-map. All other categories
    /// are untouched.
    pub fn replace_category(&mut self, name: &str, entries: CategoryTokens) {
        self.categories.insert(name.to_string(), entries);
    }

    /// Merge a step's partial result into the store. Entries overwrite
    /// same-named entries, except that two groups merge key-wise.
    pub fn merge_partial(&mut self, partial: PartialTokens) {
        for (category, entries) in partial {
            let target = self.categories.entry(category).or_default();
            for (key, incoming) in entries {
                let merged = match (target.remove(&key), incoming) {
                    (Some(TokenEntry::Group(mut existing)), TokenEntry::Group(members)) => {
                        existing.extend(members);
                        TokenEntry::Group(existing)
                    }
                    (_, incoming) => incoming,
                };
                target.insert(key, merged);
            }
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryTokens> {
        self.categories.get(name)
    }

    /// Whether the category already holds an entry under this identifier.
    pub fn contains(&self, category: &str, key: &str) -> bool {
        self.categories
            .get(category)
            .is_some_and(|entries| entries.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalToken, TextToken};

    fn sample_store() -> TokenStore {
        let mut store = TokenStore::new();
        let mut colors = CategoryTokens::new();
        colors.insert(
            "primary".into(),
            TokenEntry::Token(CanonicalToken::Str("#ff0000".into())),
        );
        let mut brand = BTreeMap::new();
        brand.insert("accent".into(), CanonicalToken::Str("rgba(0, 0, 0, 0.5)".into()));
        colors.insert("brand".into(), TokenEntry::Group(brand));
        store.replace_category("colors", colors);

        let mut spacing = CategoryTokens::new();
        spacing.insert("small".into(), TokenEntry::Token(CanonicalToken::Number(4.0)));
        spacing.insert(
            "card".into(),
            TokenEntry::Token(CanonicalToken::Dimensions {
                height: 44.0,
                width: 120.5,
            }),
        );
        store.replace_category("spacing", spacing);

        let mut typography = CategoryTokens::new();
        typography.insert(
            "body".into(),
            TokenEntry::Token(CanonicalToken::Text(TextToken {
                font_family: "Inter".into(),
                font_weight: 400.0,
                font_size: 16.0,
                text_transform: "none".into(),
                letter_spacing: 0.0,
                line_height: 1.172,
            })),
        );
        store.replace_category("typography", typography);

        store
    }

    #[test]
    fn serialize_then_load_round_trips() {
        let store = sample_store();
        let bytes = store.serialize().unwrap();
        let loaded = TokenStore::load(&bytes).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn snapshot_uses_two_space_indentation() {
        let store = sample_store();
        let text = String::from_utf8(store.serialize().unwrap()).unwrap();
        assert!(text.contains("\n  \"colors\""));
    }

    #[test]
    fn replace_category_leaves_others_untouched() {
        let mut store = sample_store();
        let mut icons = CategoryTokens::new();
        icons.insert(
            "check".into(),
            TokenEntry::Token(CanonicalToken::Str("<svg/>".into())),
        );
        store.replace_category("colors", icons);

        assert!(store.contains("colors", "check"));
        assert!(!store.contains("colors", "primary"));
        assert!(store.contains("spacing", "small"));
    }

    #[test]
    fn merge_partial_overwrites_tokens_and_merges_groups() {
        let mut store = sample_store();

        let mut colors = CategoryTokens::new();
        colors.insert(
            "primary".into(),
            TokenEntry::Token(CanonicalToken::Str("#00ff00".into())),
        );
        let mut brand = BTreeMap::new();
        brand.insert("muted".into(), CanonicalToken::Str("#333333".into()));
        colors.insert("brand".into(), TokenEntry::Group(brand));

        let mut partial = PartialTokens::new();
        partial.insert("colors".into(), colors);
        store.merge_partial(partial);

        let colors = store.category("colors").unwrap();
        assert_eq!(
            colors.get("primary"),
            Some(&TokenEntry::Token(CanonicalToken::Str("#00ff00".into())))
        );
        // Pre-existing group members survive a group merge.
        let TokenEntry::Group(brand) = colors.get("brand").unwrap() else {
            panic!("brand should still be a group");
        };
        assert!(brand.contains_key("accent"));
        assert!(brand.contains_key("muted"));
    }

    #[test]
    fn with_categories_seeds_empty_maps() {
        let store = TokenStore::with_categories(["colors", "icons"]);
        assert!(store.category("colors").unwrap().is_empty());
        assert!(store.category("icons").unwrap().is_empty());
    }

    #[test]
    fn load_rejects_malformed_snapshot() {
        assert!(TokenStore::load(b"{not json").is_err());
    }
}
