//! The extraction engine: one pass over the configured token categories,
//! producing a populated [`TokenStore`].
//!
//! Each step computes its own partial map and the engine merges results
//! sequentially after the step completes, so no two steps ever write the
//! same category concurrently. Style and geometry extraction overlap;
//! asset extraction starts only after both finish, because image
//! rendering is the most rate-limited part of the API and must not
//! compete with the cheaper calls.

mod assets;
mod geometry;
mod styles;

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::config::{Config, TokenDescriptor};
use crate::error::{FigmageError, Result};
use crate::figma_client::SourceApi;
use crate::store::TokenStore;

pub use styles::classify;

/// Whether a pass rebuilds every category or only fetches assets that
/// are missing from the loaded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    Full,
    OnlyNew,
}

pub struct Extractor<'a> {
    config: &'a Config,
    api: &'a dyn SourceApi,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config, api: &'a dyn SourceApi) -> Self {
        Self { config, api }
    }

    /// Run one complete extraction pass.
    pub async fn extract(&self, mode: ExtractMode) -> Result<TokenStore> {
        let frame_ids = if self.config.needs_frame_lookup() {
            self.api.fetch_frame_ids_by_name().await?
        } else {
            HashMap::new()
        };

        let mut store = match mode {
            ExtractMode::Full => {
                TokenStore::with_categories(self.config.tokens.iter().map(|d| d.name.clone()))
            }
            ExtractMode::OnlyNew => {
                TokenStore::load_from_path(&self.config.snapshot_path())?
            }
        };
        // A loaded snapshot may predate newly configured categories.
        for descriptor in &self.config.tokens {
            store.ensure_category(&descriptor.name);
        }

        let (style_part, geometry_part) = tokio::try_join!(
            styles::extract_styles(self.config, self.api),
            geometry::extract_geometry(self.config, self.api, &frame_ids),
        )?;
        store.merge_partial(style_part);
        store.merge_partial(geometry_part);

        let asset_part =
            assets::extract_assets(self.config, self.api, &frame_ids, &store, mode).await?;
        store.merge_partial(asset_part);

        Ok(store)
    }
}

/// Resolve a descriptor's node reference to a concrete node id.
/// Literal ids arrive percent-encoded from copied Figma URLs.
fn resolve_node_id(
    descriptor: &TokenDescriptor,
    frame_ids: &HashMap<String, String>,
) -> Result<String> {
    if let Some(name) = &descriptor.node_name {
        return frame_ids.get(name).cloned().ok_or_else(|| {
            FigmageError::config(format!(
                "token \"{}\" references unknown frame \"{name}\"",
                descriptor.name
            ))
        });
    }
    if let Some(id) = &descriptor.node_id {
        return Ok(percent_decode_str(id).decode_utf8_lossy().into_owned());
    }
    Err(FigmageError::config(format!(
        "token \"{}\" has no node reference",
        descriptor.name
    )))
}

/// Round to one decimal and clamp negative values via absolute value,
/// the normalization applied to every geometry measurement.
pub(crate) fn round_measurement(n: f64) -> f64 {
    ((n * 10.0).round() / 10.0).abs()
}

/// Round to the given number of decimals.
pub(crate) fn round_to(n: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (n * factor).round() / factor
}

pub(crate) fn channel(value: f64) -> u32 {
    (value * 255.0).round() as u32
}

pub(crate) fn rgb_to_hex(r: u32, g: u32, b: u32) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub(crate) fn rgba_string(r: u32, g: u32, b: u32, alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {alpha})")
}
