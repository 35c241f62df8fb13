//! Artist metadata document and name normalization

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Artist metadata document: raw artist name → info
///
/// Keyed by raw name so hand-edited `artistInfo.json` files keep working.
pub type ArtistDirectory = BTreeMap<String, ArtistInfo>;

/// Per-artist metadata consumed by the page generator
///
/// Field names match the existing `artistInfo.json` documents; every field
/// is optional on input and filled with the recorded defaults on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtistInfo {
    pub description: String,
    pub genre: String,
    pub followers: String,
    pub monthly_listeners: String,
    pub header_image: String,
}

impl Default for ArtistInfo {
    fn default() -> Self {
        Self {
            description: "No description available.".to_string(),
            genre: "Unknown genre".to_string(),
            followers: "N/A".to_string(),
            monthly_listeners: "N/A".to_string(),
            header_image: "../default-header.jpg".to_string(),
        }
    }
}

/// Filesystem/URL-safe identifier for an artist name
///
/// ASCII-folds common accented Latin characters, lowercases, and collapses
/// runs of any other characters into single hyphens. Idempotent: applying
/// it to its own output returns the same string. Shared by catalog grouping
/// consumers and link generation so both always agree on the same path.
pub fn artist_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if let Some(folded) = fold_accent(ch) {
            for f in folded.chars() {
                push_alphanumeric(&mut slug, f, &mut pending_separator);
            }
        } else if ch.is_ascii_alphanumeric() {
            push_alphanumeric(&mut slug, ch.to_ascii_lowercase(), &mut pending_separator);
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("unknown-artist");
    }
    slug
}

fn push_alphanumeric(slug: &mut String, ch: char, pending_separator: &mut bool) {
    if *pending_separator && !slug.is_empty() {
        slug.push('-');
    }
    *pending_separator = false;
    slug.push(ch);
}

/// Lowercased ASCII replacement for accented Latin characters
fn fold_accent(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ñ' | 'Ñ' => "n",
        'ç' | 'Ç' => "c",
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'đ' | 'Đ' => "d",
        _ => return None,
    };
    Some(folded)
}
