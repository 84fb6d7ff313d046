//! Name formatting.
//!
//! Raw Figma display names ("Button Height / Large", "icon-arrow_left")
//! are normalized into identifiers under a configurable casing policy.
//! Formatting is pure and total: any input produces a string, and
//! formatting an already-formatted name is a no-op.

use serde::{Deserialize, Deserializer};

/// Casing policy for normalized token identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Casing {
    #[default]
    Camel,
    Kebab,
    Snake,
    Lower,
    Upper,
}

impl Casing {
    /// Total lookup: unknown names fall back to the default policy
    /// rather than failing, per the formatter contract.
    pub fn from_name(name: &str) -> Casing {
        match name {
            "camel" => Casing::Camel,
            "kebab" => Casing::Kebab,
            "snake" => Casing::Snake,
            "lower" => Casing::Lower,
            "upper" => Casing::Upper,
            _ => Casing::default(),
        }
    }
}

impl<'de> Deserialize<'de> for Casing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Casing::from_name(&name))
    }
}

/// Format a raw display name under the given casing policy.
pub fn format_name(name: &str, casing: Casing) -> String {
    let words = split_words(name);

    match casing {
        Casing::Camel => words
            .iter()
            .enumerate()
            .map(|(i, word)| if i == 0 { word.clone() } else { capitalize(word) })
            .collect(),
        Casing::Kebab => words.join("-"),
        Casing::Snake => words.join("_"),
        Casing::Lower => words.concat(),
        Casing::Upper => words.concat().to_uppercase(),
    }
}

/// Split a name into lowercase words on separators and camel humps.
/// Digits stay attached to the preceding segment ("icon24" is one word).
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let prev = i.checked_sub(1).and_then(|p| chars.get(p)).copied();
        let next = chars.get(i + 1).copied();

        // Boundary before "B" in "aB" and before "Bc" in "ABc".
        let hump = ch.is_uppercase()
            && (prev.is_some_and(|p| p.is_lowercase() || p.is_numeric())
                || (prev.is_some_and(|p| p.is_uppercase())
                    && next.is_some_and(|n| n.is_lowercase())));

        if hump && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.extend(ch.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_from_spaced_name() {
        assert_eq!(
            format_name("Button Height Large", Casing::Camel),
            "buttonHeightLarge"
        );
    }

    #[test]
    fn kebab_case_from_mixed_separators() {
        assert_eq!(
            format_name("icon-arrow_left", Casing::Kebab),
            "icon-arrow-left"
        );
    }

    #[test]
    fn snake_case_splits_camel_humps() {
        assert_eq!(format_name("focusRingSize", Casing::Snake), "focus_ring_size");
    }

    #[test]
    fn acronym_runs_split_before_trailing_word() {
        assert_eq!(format_name("APIKey", Casing::Kebab), "api-key");
    }

    #[test]
    fn digits_stay_with_their_word() {
        assert_eq!(format_name("icon24 px", Casing::Camel), "icon24Px");
    }

    #[test]
    fn lower_and_upper_concatenate() {
        assert_eq!(format_name("Focus Ring", Casing::Lower), "focusring");
        assert_eq!(format_name("Focus Ring", Casing::Upper), "FOCUSRING");
    }

    #[test]
    fn formatting_is_idempotent_for_every_casing() {
        let inputs = ["Button Height / Large", "shadow-small", "APIKey 2x"];
        let casings = [
            Casing::Camel,
            Casing::Kebab,
            Casing::Snake,
            Casing::Lower,
            Casing::Upper,
        ];
        for input in inputs {
            for casing in casings {
                let once = format_name(input, casing);
                assert_eq!(format_name(&once, casing), once, "{input:?} via {casing:?}");
            }
        }
    }

    #[test]
    fn unknown_casing_name_falls_back_to_default() {
        assert_eq!(Casing::from_name("pascal"), Casing::default());
        assert_eq!(Casing::from_name("kebab"), Casing::Kebab);
    }

    #[test]
    fn empty_input_formats_to_empty() {
        assert_eq!(format_name("", Casing::Camel), "");
        assert_eq!(format_name("///", Casing::Kebab), "");
    }
}
