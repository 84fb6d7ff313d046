//! Minimal SVG cleanup passes applied to fetched icon markup.
//!
//! Token output only needs compact markup and themeable colors; the full
//! optimizer pipeline stays an external concern. Passes: strip the XML
//! prolog/doctype/comments, collapse whitespace between tags, and
//! (optionally) rewrite hard-coded fill/stroke colors to `currentColor`.
//! Color conversion covers hex and `rgb()`/`rgba()` values; keywords like
//! `none` and named colors are left untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Per-category optimizer options, merged over the defaults from the
/// descriptor's `options` block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgoOptions {
    /// Rewrite `fill`/`stroke` color values to `currentColor` so icons
    /// inherit their color from surrounding text.
    pub convert_colors: bool,
}

impl Default for SvgoOptions {
    fn default() -> Self {
        Self {
            convert_colors: true,
        }
    }
}

static XML_PROLOG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\?xml.*?\?>").unwrap());
static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]*>").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static INTER_TAG_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").unwrap());
static PAINT_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"(fill|stroke)="(?:#[0-9a-fA-F]{3,8}|rgba?\([^"]*\))""##).unwrap()
});

pub fn optimize_svg(svg: &str, options: &SvgoOptions) -> String {
    let svg = XML_PROLOG.replace_all(svg, "");
    let svg = DOCTYPE.replace_all(&svg, "");
    let svg = COMMENT.replace_all(&svg, "");
    let svg = INTER_TAG_SPACE.replace_all(&svg, "><");
    let svg = svg.trim().to_string();

    if options.convert_colors {
        PAINT_COLOR
            .replace_all(&svg, "$1=\"currentColor\"")
            .into_owned()
    } else {
        svg
    }
}
