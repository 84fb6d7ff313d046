//! Asset extraction: component children rendered as SVG markup or PNG
//! URLs, scheduled last because image rendering is the API's most
//! rate-limited surface.

use std::collections::HashMap;

use crate::batch::run_batched;
use crate::config::{Config, TokenDescriptor};
use crate::error::{FigmageError, Result};
use crate::figma_client::SourceApi;
use crate::format::format_name;
use crate::store::{CategoryTokens, PartialTokens, TokenEntry, TokenStore};
use crate::svgo::{optimize_svg, SvgoOptions};
use crate::types::{CanonicalToken, ImageFormat, TokenKind};

use super::{resolve_node_id, ExtractMode};

/// Extract every svg/png category. The returned partial holds only the
/// tokens processed in this pass: in only-new mode, entries already in
/// `store` are neither re-fetched nor re-emitted, and the engine's merge
/// preserves them.
pub(crate) async fn extract_assets(
    config: &Config,
    api: &dyn SourceApi,
    frame_ids: &HashMap<String, String>,
    store: &TokenStore,
    mode: ExtractMode,
) -> Result<PartialTokens> {
    let mut partial = PartialTokens::new();

    for descriptor in config.descriptors_of_kind(|kind| kind.is_asset()) {
        let node_id = resolve_node_id(descriptor, frame_ids)?;
        let children = api.fetch_node_children(&node_id).await?;

        let mut named: Vec<(String, String)> = children
            .into_iter()
            .map(|node| (format_name(&node.name, config.token_case), node.id))
            .collect();

        if mode == ExtractMode::OnlyNew {
            named.retain(|(key, _)| !store.contains(&descriptor.name, key));
        }
        if named.is_empty() {
            // Nothing new: skip the render calls and leave the category
            // untouched.
            continue;
        }

        let entries = match descriptor.kind {
            TokenKind::Svg => extract_svgs(config, api, descriptor, &named).await?,
            TokenKind::Png => extract_pngs(api, &named).await?,
            _ => continue,
        };
        partial.insert(descriptor.name.clone(), entries);
    }

    Ok(partial)
}

async fn extract_svgs(
    config: &Config,
    api: &dyn SourceApi,
    descriptor: &TokenDescriptor,
    named: &[(String, String)],
) -> Result<CategoryTokens> {
    let ids: Vec<String> = named.iter().map(|(_, id)| id.clone()).collect();
    let images = api.fetch_images(&ids, ImageFormat::Svg).await?;
    let options = descriptor.options.clone().unwrap_or_else(SvgoOptions::default);

    let keyed_urls: Vec<(String, String)> = named
        .iter()
        .map(|(key, id)| {
            let url = images.get(id).ok_or_else(|| {
                FigmageError::source_api(None, format!("no rendered image for node {id}"))
            })?;
            Ok((key.clone(), url.clone()))
        })
        .collect::<Result<_>>()?;

    let contents = run_batched(keyed_urls, config.batch_size, |(key, url)| async move {
        let body = api.fetch_image_contents(&url).await?;
        Ok((key, body))
    })
    .await?;

    Ok(contents
        .into_iter()
        .map(|(key, body)| {
            (
                key,
                TokenEntry::Token(CanonicalToken::Str(optimize_svg(&body, &options))),
            )
        })
        .collect())
}

/// PNG tokens store the rendered URL directly; downloading happens in
/// the emission stage, not here.
async fn extract_pngs(
    api: &dyn SourceApi,
    named: &[(String, String)],
) -> Result<CategoryTokens> {
    let ids: Vec<String> = named.iter().map(|(_, id)| id.clone()).collect();
    let images = api.fetch_images(&ids, ImageFormat::Png).await?;

    named
        .iter()
        .map(|(key, id)| {
            let url = images.get(id).ok_or_else(|| {
                FigmageError::source_api(None, format!("no rendered image for node {id}"))
            })?;
            Ok((
                key.clone(),
                TokenEntry::Token(CanonicalToken::Str(url.clone())),
            ))
        })
        .collect()
}
