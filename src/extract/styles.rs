//! Style classification: published FILL/TEXT/EFFECT styles become color,
//! gradient, typography and shadow tokens.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::config::{Config, TokenDescriptor};
use crate::error::{FigmageError, Result};
use crate::figma_client::SourceApi;
use crate::format::format_name;
use crate::store::{CategoryTokens, PartialTokens, TokenEntry};
use crate::types::{
    CanonicalToken, Color, Effect, GradientStopToken, NodeRecord, ShadowColor, ShadowToken,
    StyleClass, TextToken, TokenKind, Vector,
};

use super::{channel, rgb_to_hex, rgba_string, round_to};

struct NamedStyle {
    group: Option<String>,
    name: String,
    style_type: String,
}

pub(crate) async fn extract_styles(
    config: &Config,
    api: &dyn SourceApi,
) -> Result<PartialTokens> {
    let mut partial = PartialTokens::new();

    if !config.has_style_bound_tokens() {
        return Ok(partial);
    }

    let styles = api.fetch_styles().await?;
    if styles.is_empty() {
        return Ok(partial);
    }

    let named: HashMap<String, NamedStyle> = styles
        .into_iter()
        .map(|style| {
            let (group, name) = split_group(&style.name, &config.group_separator, config);
            (
                style.node_id,
                NamedStyle {
                    group,
                    name,
                    style_type: style.style_type,
                },
            )
        })
        .collect();

    let ids: Vec<String> = named.keys().cloned().collect();
    let nodes = api.fetch_nodes(&ids).await?;

    for (id, node) in &nodes {
        let Some(style) = named.get(id) else {
            continue;
        };
        let Some(class) = classify(&style.style_type, node)? else {
            continue;
        };

        // A record whose kind no descriptor declares is simply not
        // configured for this pass.
        let kind = match &class {
            StyleClass::Color { .. } => TokenKind::Color,
            StyleClass::Gradient { .. } => TokenKind::LinearGradient,
            StyleClass::Text(_) => TokenKind::Text,
            StyleClass::Shadow(_) => TokenKind::DropShadow,
        };
        let Some(descriptor) = config.style_descriptor(kind) else {
            continue;
        };

        let token = match class {
            StyleClass::Color { color, opacity } => {
                CanonicalToken::Str(color_value(color, opacity))
            }
            StyleClass::Gradient { stops, handles } => {
                CanonicalToken::Gradient(gradient_token(&stops, &handles)?)
            }
            StyleClass::Text(type_style) => CanonicalToken::Text(TextToken {
                font_family: type_style.font_family,
                font_weight: type_style.font_weight,
                font_size: type_style.font_size,
                text_transform: text_transform(type_style.text_case.as_deref()),
                letter_spacing: round_to(type_style.letter_spacing, 2),
                line_height: round_to(type_style.line_height_px / type_style.font_size, 3),
            }),
            StyleClass::Shadow(effects) => shadows_token(&effects)?,
        };
        insert_token(&mut partial, descriptor, style, token);
    }

    Ok(partial)
}

/// Split `"group/name"` display names and normalize both halves.
/// Names with several separators keep everything after the first as the
/// name ("a/b/c" → group "a", name "b c").
fn split_group(raw: &str, separator: &str, config: &Config) -> (Option<String>, String) {
    if let Some((group, rest)) = raw.split_once(separator) {
        let group = group.trim();
        let name = rest
            .split(separator)
            .collect::<Vec<_>>()
            .join(" ");
        let name = format_name(&name, config.token_case);
        if group.is_empty() {
            return (None, name);
        }
        return (Some(format_name(group, config.token_case)), name);
    }
    (None, format_name(raw, config.token_case))
}

/// Resolve a style record and its node into one of the four token
/// classes, or `None` when the combination is not token material
/// (image fills, blur effects, unknown style types).
///
/// A style whose node is missing the payload its type promises is a
/// malformed API response, not a skippable record.
pub fn classify(style_type: &str, node: &NodeRecord) -> Result<Option<StyleClass>> {
    match style_type {
        "FILL" => {
            let fill = node.fills.first().ok_or_else(|| {
                FigmageError::source_api(
                    None,
                    format!("FILL style node {} has no fills", node.id),
                )
            })?;
            match fill.paint_type.as_str() {
                "SOLID" => {
                    let color = fill.color.ok_or_else(|| {
                        FigmageError::source_api(
                            None,
                            format!("solid fill on node {} has no color", node.id),
                        )
                    })?;
                    Ok(Some(StyleClass::Color {
                        color,
                        opacity: fill.opacity,
                    }))
                }
                "GRADIENT_LINEAR" => Ok(Some(StyleClass::Gradient {
                    stops: fill.gradient_stops.clone(),
                    handles: fill.gradient_handle_positions.clone(),
                })),
                _ => Ok(None),
            }
        }
        "TEXT" => {
            let type_style = node.style.clone().ok_or_else(|| {
                FigmageError::source_api(
                    None,
                    format!("TEXT style node {} has no type style", node.id),
                )
            })?;
            Ok(Some(StyleClass::Text(type_style)))
        }
        "EFFECT" => {
            let first = node.effects.first().ok_or_else(|| {
                FigmageError::source_api(
                    None,
                    format!("EFFECT style node {} has no effects", node.id),
                )
            })?;
            if first.effect_type == "DROP_SHADOW" {
                Ok(Some(StyleClass::Shadow(node.effects.clone())))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

/// Opacity present means an `rgba()` value, otherwise plain hex.
fn color_value(color: Color, opacity: Option<f64>) -> String {
    let (r, g, b) = (channel(color.r), channel(color.g), channel(color.b));
    match opacity {
        Some(alpha) => rgba_string(r, g, b, round_to(alpha, 2)),
        None => rgb_to_hex(r, g, b),
    }
}

/// Gradient stops pair each stop color with the handle position indexed
/// by the stop's position, rounded to one decimal (absolute value).
///
/// Only endpoint stops (integral positions) carry a handle; a fractional
/// position has no handle to pair with and fails the pass rather than
/// truncating onto handle 0.
fn gradient_token(
    stops: &[crate::types::GradientStop],
    handles: &[Vector],
) -> Result<Vec<GradientStopToken>> {
    stops
        .iter()
        .map(|stop| {
            if stop.position.fract() != 0.0 || stop.position < 0.0 {
                return Err(FigmageError::source_api(
                    None,
                    format!(
                        "gradient stop position {} is not a handle index",
                        stop.position
                    ),
                ));
            }
            let handle = handles.get(stop.position as usize).ok_or_else(|| {
                FigmageError::source_api(
                    None,
                    format!("gradient stop at {} has no handle position", stop.position),
                )
            })?;
            let color = stop.color;
            Ok(GradientStopToken {
                hex: rgb_to_hex(channel(color.r), channel(color.g), channel(color.b)),
                x: super::round_measurement(handle.x),
                y: super::round_measurement(handle.y),
            })
        })
        .collect()
}

fn text_transform(text_case: Option<&str>) -> String {
    if text_case == Some("UPPER") {
        "uppercase".to_string()
    } else {
        "none".to_string()
    }
}

fn shadow_token(effect: &Effect) -> Result<ShadowToken> {
    let color = effect.color.ok_or_else(|| {
        FigmageError::source_api(None, "drop shadow effect has no color")
    })?;
    let offset = effect.offset.unwrap_or_default();
    let (r, g, b) = (channel(color.r), channel(color.g), channel(color.b));
    let alpha = round_to(color.a, 2);
    let rgba = rgba_string(r, g, b, alpha);
    let hex = rgb_to_hex(r, g, b);

    Ok(ShadowToken {
        box_shadow: format!(
            "{}px {}px {}px {rgba}",
            offset.x, offset.y, effect.radius
        ),
        offset,
        radius: effect.radius,
        opacity: alpha,
        color: ShadowColor { hex, rgba },
    })
}

/// A single effect serializes as one shadow object, several as a list.
fn shadows_token(effects: &[Effect]) -> Result<CanonicalToken> {
    let mut shadows: Vec<ShadowToken> = effects
        .iter()
        .map(shadow_token)
        .collect::<Result<Vec<_>>>()?;
    if shadows.len() == 1 {
        Ok(CanonicalToken::Shadow(shadows.remove(0)))
    } else {
        Ok(CanonicalToken::ShadowList(shadows))
    }
}

fn insert_token(
    partial: &mut PartialTokens,
    descriptor: &TokenDescriptor,
    style: &NamedStyle,
    token: CanonicalToken,
) {
    let category = partial
        .entry(descriptor.name.clone())
        .or_insert_with(CategoryTokens::new);

    match &style.group {
        Some(group) => {
            let entry = category
                .entry(group.clone())
                .or_insert_with(|| TokenEntry::Group(BTreeMap::new()));
            if let TokenEntry::Group(members) = entry {
                members.insert(style.name.clone(), token);
            } else {
                // A flat token and a group share the same name in the
                // remote data; last write wins, like any duplicate.
                *entry = TokenEntry::Group(BTreeMap::from([(style.name.clone(), token)]));
            }
        }
        None => {
            category.insert(style.name.clone(), TokenEntry::Token(token));
        }
    }
}
