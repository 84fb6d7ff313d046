//! Data types used throughout the figmage library.
//!
//! This module is organized by domain:
//! - [`figma`] - Raw records returned by the Figma API
//! - [`tokens`] - The canonical design-token model

pub mod figma;
pub mod tokens;

// Re-export the raw API types
pub use figma::{
    BoundingBox, Color, Effect, GradientStop, ImageFormat, NodeRecord, Paint, StyleRecord,
    TypeStyle, Vector,
};

// Re-export the token model
pub use tokens::{
    CanonicalToken, GradientStopToken, ShadowColor, ShadowToken, StyleClass, TextToken, TokenKind,
};
