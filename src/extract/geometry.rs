//! Geometry extraction: heights, widths, dimensions and corner radii
//! read from the component children of a referenced frame.

use std::collections::HashMap;

use crate::config::{Config, TokenDescriptor};
use crate::error::{FigmageError, Result};
use crate::figma_client::SourceApi;
use crate::format::format_name;
use crate::store::{CategoryTokens, PartialTokens, TokenEntry};
use crate::types::{CanonicalToken, NodeRecord, TokenKind};

use super::{resolve_node_id, round_measurement};

pub(crate) async fn extract_geometry(
    config: &Config,
    api: &dyn SourceApi,
    frame_ids: &HashMap<String, String>,
) -> Result<PartialTokens> {
    let descriptors: Vec<&TokenDescriptor> =
        config.descriptors_of_kind(|kind| kind.is_geometry()).collect();

    // Descriptors are independent; their children fetches may overlap.
    let categories = futures::future::try_join_all(
        descriptors
            .into_iter()
            .map(|d| extract_category(config, api, frame_ids, d)),
    )
    .await?;

    Ok(categories.into_iter().collect())
}

async fn extract_category(
    config: &Config,
    api: &dyn SourceApi,
    frame_ids: &HashMap<String, String>,
    descriptor: &TokenDescriptor,
) -> Result<(String, CategoryTokens)> {
    let node_id = resolve_node_id(descriptor, frame_ids)?;
    let children = api.fetch_node_children(&node_id).await?;

    let mut entries = CategoryTokens::new();
    for child in &children {
        let key = format_name(&child.name, config.token_case);
        let token = geometry_token(descriptor.kind, child)?;
        entries.insert(key, TokenEntry::Token(token));
    }

    Ok((descriptor.name.clone(), entries))
}

fn geometry_token(kind: TokenKind, node: &NodeRecord) -> Result<CanonicalToken> {
    let bbox = || {
        node.absolute_bounding_box.ok_or_else(|| {
            FigmageError::source_api(
                None,
                format!("node {} ({}) has no bounding box", node.id, node.name),
            )
        })
    };

    match kind {
        TokenKind::Height => Ok(CanonicalToken::Number(round_measurement(bbox()?.height))),
        TokenKind::Width => Ok(CanonicalToken::Number(round_measurement(bbox()?.width))),
        TokenKind::Dimensions => {
            let bbox = bbox()?;
            Ok(CanonicalToken::Dimensions {
                height: round_measurement(bbox.height),
                width: round_measurement(bbox.width),
            })
        }
        TokenKind::Radius => {
            // Radius components wrap a single shape child carrying the
            // corner radius.
            let radius = node
                .children
                .first()
                .and_then(|child| child.corner_radius)
                .ok_or_else(|| {
                    FigmageError::source_api(
                        None,
                        format!("node {} ({}) has no corner radius child", node.id, node.name),
                    )
                })?;
            Ok(CanonicalToken::Number(round_measurement(radius)))
        }
        other => Err(FigmageError::config(format!(
            "kind \"{other}\" is not a geometry kind"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn sized_node(name: &str, height: f64, width: f64) -> NodeRecord {
        NodeRecord {
            id: "1:1".to_string(),
            name: name.to_string(),
            node_type: "COMPONENT".to_string(),
            absolute_bounding_box: Some(BoundingBox { height, width }),
            ..Default::default()
        }
    }

    #[test]
    fn heights_round_to_one_decimal() {
        let token = geometry_token(TokenKind::Height, &sized_node("Button", 43.96, 120.0)).unwrap();
        assert_eq!(token, CanonicalToken::Number(44.0));
    }

    #[test]
    fn negative_bounding_values_store_their_absolute_value() {
        let token = geometry_token(TokenKind::Width, &sized_node("Rule", 1.0, -12.5)).unwrap();
        assert_eq!(token, CanonicalToken::Number(12.5));
    }

    #[test]
    fn dimensions_capture_both_axes() {
        let token =
            geometry_token(TokenKind::Dimensions, &sized_node("Card", 44.04, 320.0)).unwrap();
        assert_eq!(
            token,
            CanonicalToken::Dimensions {
                height: 44.0,
                width: 320.0
            }
        );
    }

    #[test]
    fn radius_reads_the_first_child() {
        let node = NodeRecord {
            id: "1:1".to_string(),
            name: "Radius Small".to_string(),
            children: vec![NodeRecord {
                corner_radius: Some(4.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let token = geometry_token(TokenKind::Radius, &node).unwrap();
        assert_eq!(token, CanonicalToken::Number(4.0));
    }

    #[test]
    fn missing_bounding_box_is_a_source_api_error() {
        let node = NodeRecord {
            id: "1:1".to_string(),
            name: "Broken".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            geometry_token(TokenKind::Height, &node),
            Err(FigmageError::SourceApi { .. })
        ));
    }

    #[test]
    fn missing_radius_child_is_a_source_api_error() {
        let node = NodeRecord {
            id: "1:1".to_string(),
            name: "Broken".to_string(),
            ..Default::default()
        };
        assert!(geometry_token(TokenKind::Radius, &node).is_err());
    }
}
