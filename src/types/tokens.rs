//! The canonical design-token model.
//!
//! Tokens serialize to the same JSON shapes the snapshot file has always
//! used, so the enum is untagged: a color is just a string, a measurement
//! just a number, and so on.

use serde::{Deserialize, Serialize};

use super::figma::{Effect, GradientStop, TypeStyle, Vector};

/// The category kinds a token descriptor can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Color,
    LinearGradient,
    Text,
    DropShadow,
    Height,
    Width,
    Dimensions,
    Radius,
    Svg,
    Png,
}

impl TokenKind {
    /// Kinds extracted from published style records (looked up by kind,
    /// so at most one descriptor per pass may declare each of these).
    pub fn is_style_bound(&self) -> bool {
        matches!(
            self,
            TokenKind::Color | TokenKind::LinearGradient | TokenKind::Text | TokenKind::DropShadow
        )
    }

    /// Kinds read from the geometry of a frame's component children.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            TokenKind::Height | TokenKind::Width | TokenKind::Dimensions | TokenKind::Radius
        )
    }

    /// Kinds that render images through the images endpoint.
    pub fn is_asset(&self) -> bool {
        matches!(self, TokenKind::Svg | TokenKind::Png)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Color => "color",
            TokenKind::LinearGradient => "linear-gradient",
            TokenKind::Text => "text",
            TokenKind::DropShadow => "drop-shadow",
            TokenKind::Height => "height",
            TokenKind::Width => "width",
            TokenKind::Dimensions => "dimensions",
            TokenKind::Radius => "radius",
            TokenKind::Svg => "svg",
            TokenKind::Png => "png",
        };
        f.write_str(name)
    }
}

/// A normalized token value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalToken {
    /// Heights, widths and radii, rounded to one decimal.
    Number(f64),
    /// Colors (`#rrggbb` / `rgba(...)`), optimized SVG markup, PNG URLs.
    Str(String),
    Dimensions {
        height: f64,
        width: f64,
    },
    Text(TextToken),
    Shadow(ShadowToken),
    ShadowList(Vec<ShadowToken>),
    Gradient(Vec<GradientStopToken>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToken {
    pub font_family: String,
    pub font_weight: f64,
    pub font_size: f64,
    /// `"uppercase"` or `"none"`.
    pub text_transform: String,
    pub letter_spacing: f64,
    /// `lineHeightPx / fontSize`, rounded to three decimals.
    pub line_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowToken {
    /// CSS shorthand: `"0px 4px 16px rgba(0, 0, 0, 0.12)"`.
    pub box_shadow: String,
    pub offset: Vector,
    pub radius: f64,
    pub opacity: f64,
    pub color: ShadowColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowColor {
    pub hex: String,
    pub rgba: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStopToken {
    pub hex: String,
    pub x: f64,
    pub y: f64,
}

/// Result of classifying a style record together with its node.
///
/// Produced once at the extraction boundary and matched exhaustively,
/// instead of re-inspecting the raw string tags in every handler.
#[derive(Debug, Clone)]
pub enum StyleClass {
    Color {
        color: super::figma::Color,
        opacity: Option<f64>,
    },
    Gradient {
        stops: Vec<GradientStop>,
        handles: Vec<Vector>,
    },
    Text(TypeStyle),
    Shadow(Vec<Effect>),
}
