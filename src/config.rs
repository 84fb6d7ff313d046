//! Run configuration: the token descriptors plus naming, output and
//! batching settings, loaded from a JSON config file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FigmageError, Result};
use crate::format::Casing;
use crate::svgo::SvgoOptions;
use crate::types::TokenKind;

pub const DEFAULT_CONFIG_FILE: &str = ".figmage.json";

/// How many requests run concurrently against rate-limited endpoints.
const DEFAULT_BATCH_SIZE: usize = 40;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// One descriptor per token category.
    pub tokens: Vec<TokenDescriptor>,
    /// Casing policy for normalized identifiers.
    #[serde(default)]
    pub token_case: Casing,
    /// Separator splitting `"group/name"` style names.
    #[serde(default = "default_group_separator")]
    pub group_separator: String,
    /// Directory holding the `tokens.json` snapshot.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// One token category from the configuration.
///
/// Style-bound kinds (color, linear-gradient, text, drop-shadow) bind to
/// published styles by kind; the rest reference a node either by id or
/// by top-level frame name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub options: Option<SvgoOptions>,
}

fn default_group_separator() -> String {
    "/".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("tokens")
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FigmageError::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| {
            FigmageError::config(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(FigmageError::config("batchSize must be at least 1"));
        }

        let mut names = HashSet::new();
        let mut style_kinds = HashSet::new();

        for descriptor in &self.tokens {
            if !names.insert(descriptor.name.as_str()) {
                return Err(FigmageError::config(format!(
                    "duplicate token name \"{}\"",
                    descriptor.name
                )));
            }

            // Style-bound extraction looks descriptors up by kind, so a
            // second descriptor of the same kind would be ambiguous.
            if descriptor.kind.is_style_bound() && !style_kinds.insert(descriptor.kind) {
                return Err(FigmageError::config(format!(
                    "token \"{}\": kind \"{}\" is already declared by another token",
                    descriptor.name, descriptor.kind
                )));
            }

            if descriptor.kind.is_style_bound() {
                continue;
            }
            if descriptor.node_id.is_none() && descriptor.node_name.is_none() {
                return Err(FigmageError::config(format!(
                    "token \"{}\" of kind \"{}\" needs a nodeId or nodeName",
                    descriptor.name, descriptor.kind
                )));
            }
        }

        Ok(())
    }

    /// The descriptor owning a style-bound kind, if configured.
    pub fn style_descriptor(&self, kind: TokenKind) -> Option<&TokenDescriptor> {
        self.tokens.iter().find(|d| d.kind == kind)
    }

    pub fn descriptors_of_kind(
        &self,
        predicate: impl Fn(TokenKind) -> bool,
    ) -> impl Iterator<Item = &TokenDescriptor> {
        self.tokens.iter().filter(move |d| predicate(d.kind))
    }

    pub fn has_style_bound_tokens(&self) -> bool {
        self.tokens.iter().any(|d| d.kind.is_style_bound())
    }

    /// Whether any descriptor references a node by frame name, requiring
    /// one frame listing call before extraction.
    pub fn needs_frame_lookup(&self) -> bool {
        self.tokens.iter().any(|d| d.node_name.is_some())
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.out_dir.join("tokens.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Casing;

    fn parse(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let config = parse(r#"{ "tokens": [] }"#);
        assert_eq!(config.token_case, Casing::Camel);
        assert_eq!(config.group_separator, "/");
        assert_eq!(config.out_dir, PathBuf::from("tokens"));
        assert_eq!(config.batch_size, 40);
        assert_eq!(config.snapshot_path(), PathBuf::from("tokens/tokens.json"));
    }

    #[test]
    fn unknown_token_case_falls_back_to_default() {
        let config = parse(r#"{ "tokens": [], "tokenCase": "pascal" }"#);
        assert_eq!(config.token_case, Casing::Camel);
    }

    #[test]
    fn parses_descriptors_with_kind_and_node_reference() {
        let config = parse(
            r#"{
                "tokens": [
                    { "name": "colors", "type": "color" },
                    { "name": "gradients", "type": "linear-gradient" },
                    { "name": "icons", "type": "svg", "nodeName": "Icons",
                      "options": { "convertColors": false } },
                    { "name": "spacing", "type": "width", "nodeId": "1:23" }
                ]
            }"#,
        );
        config.validate().unwrap();
        assert_eq!(config.tokens.len(), 4);
        assert_eq!(config.tokens[1].kind, TokenKind::LinearGradient);
        assert!(!config.tokens[2].options.as_ref().unwrap().convert_colors);
        assert!(config.needs_frame_lookup());
    }

    #[test]
    fn rejects_zero_batch_size() {
        let config = parse(r#"{ "tokens": [], "batchSize": 0 }"#);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_style_bound_kind() {
        let config = parse(
            r#"{
                "tokens": [
                    { "name": "light", "type": "color" },
                    { "name": "dark", "type": "color" }
                ]
            }"#,
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("dark"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let config = parse(
            r#"{
                "tokens": [
                    { "name": "icons", "type": "svg", "nodeId": "1:2" },
                    { "name": "icons", "type": "png", "nodeId": "3:4" }
                ]
            }"#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_geometry_descriptor_without_node_reference() {
        let config = parse(r#"{ "tokens": [{ "name": "radii", "type": "radius" }] }"#);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("radii"));
    }
}
