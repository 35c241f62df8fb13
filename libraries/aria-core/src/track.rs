//! Track model and catalog-document normalization

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// Artist name applied when a catalog entry carries none
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A single catalog entry
///
/// Tracks are immutable once loaded. `src` is the identity key used to
/// reconcile search results against the playback queue; two tracks with the
/// same `src` are the same track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Display title
    pub title: String,

    /// Artist credit as written in the tags (may contain `/`-separated
    /// featured artists; see [`Track::primary_artist`])
    pub artist: String,

    /// Playable source URI
    pub src: String,

    /// Album art URI (file path or data URI)
    #[serde(rename = "albumArt", default, skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,
}

impl Track {
    /// Create a track with no album art
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            src: src.into(),
            album_art: None,
        }
    }

    /// Build a track from possibly-missing metadata, applying the catalog
    /// defaults: title falls back to `"Track {ordinal}"`, artist falls back
    /// to [`UNKNOWN_ARTIST`]. `ordinal` is the 1-based document position.
    pub fn from_partial(
        title: Option<String>,
        artist: Option<String>,
        src: String,
        album_art: Option<String>,
        ordinal: usize,
    ) -> Self {
        Self {
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| fallback_title(ordinal)),
            artist: artist
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            src,
            album_art,
        }
    }

    /// Primary artist name: the text before the first `/`, trimmed
    ///
    /// Used as the grouping and display key for artist pages.
    pub fn primary_artist(&self) -> &str {
        self.artist
            .split('/')
            .next()
            .unwrap_or(self.artist.as_str())
            .trim()
    }
}

/// Default title for the track at 1-based position `ordinal`
pub fn fallback_title(ordinal: usize) -> String {
    format!("Track {ordinal}")
}

/// Catalog-document entry before normalization
///
/// Title and artist may be absent in the document; `src` is required for a
/// loadable track.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTrack {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    src: Option<String>,
    #[serde(rename = "albumArt", default)]
    album_art: Option<String>,
}

impl RawTrack {
    /// Apply load-time defaults; fails when the entry has no source
    pub(crate) fn normalize(self, ordinal: usize) -> Result<Track, CatalogError> {
        let src = match self.src {
            Some(src) if !src.trim().is_empty() => src,
            _ => return Err(CatalogError::MissingSource { ordinal }),
        };

        Ok(Track::from_partial(
            self.title,
            self.artist,
            src,
            self.album_art,
            ordinal,
        ))
    }
}
