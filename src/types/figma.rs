//! Raw records returned by the Figma API.
//!
//! Figma tags styles and paints with ad hoc strings (`FILL`, `SOLID`,
//! `GRADIENT_LINEAR`, ...). The tags are kept verbatim here and resolved
//! into the closed [`StyleClass`](super::tokens::StyleClass) sum by a
//! single classification step at the extraction boundary, so unrecognized
//! combinations are handled in exactly one place.

use serde::{Deserialize, Serialize};

/// A published style from the styles listing endpoint.
///
/// `name` may carry a group prefix (`"group/name"`); splitting happens
/// during extraction, not here.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleRecord {
    pub node_id: String,
    pub name: String,
    /// `FILL`, `TEXT` or `EFFECT`.
    pub style_type: String,
}

/// One node of the remote document tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    /// `COMPONENT`, `FRAME`, `CANVAS`, etc.
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub absolute_bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub children: Vec<NodeRecord>,
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub style: Option<TypeStyle>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub height: f64,
    pub width: f64,
}

/// A fill paint on a node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    /// `SOLID`, `GRADIENT_LINEAR`, `IMAGE`, ...
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub gradient_stops: Vec<GradientStop>,
    #[serde(default)]
    pub gradient_handle_positions: Vec<Vector>,
}

/// Color channels in the 0.0-1.0 range, as the API delivers them.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// A visual effect on a node (used for shadow styles).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    /// `DROP_SHADOW`, `INNER_SHADOW`, `LAYER_BLUR`, ...
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub offset: Option<Vector>,
    #[serde(default)]
    pub radius: f64,
}

/// Typography properties of a `TEXT` style node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    pub font_family: String,
    pub font_weight: f64,
    pub font_size: f64,
    /// `UPPER`, `LOWER`, `TITLE` or absent.
    #[serde(default)]
    pub text_case: Option<String>,
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub line_height_px: f64,
}

/// Rendered-image formats supported by the images endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}
