pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod figma_client;
pub mod format;
pub mod store;
pub mod svgo;
pub mod types;

pub use batch::run_batched;
pub use config::{Config, TokenDescriptor, DEFAULT_CONFIG_FILE};
pub use error::{FigmageError, Result};
pub use extract::{classify, ExtractMode, Extractor};
pub use figma_client::{
    FigmaApiClient, FigmaFileResponse, FigmaImagesResponse, FigmaNodesResponse,
    FigmaStylesResponse, FigmaVersionsResponse, SourceApi,
};
pub use format::{format_name, Casing};
pub use store::{CategoryTokens, PartialTokens, TokenEntry, TokenStore};
pub use svgo::{optimize_svg, SvgoOptions};
pub use types::{
    BoundingBox, CanonicalToken, Color, Effect, GradientStop, GradientStopToken, ImageFormat,
    NodeRecord, Paint, ShadowColor, ShadowToken, StyleClass, StyleRecord, TextToken, TokenKind,
    TypeStyle, Vector,
};
