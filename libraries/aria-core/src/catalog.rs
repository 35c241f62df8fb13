//! Track catalog: ordered, immutable after load

use crate::error::Result;
use crate::track::{RawTrack, Track};
use std::collections::HashMap;
use std::path::Path;

/// Ordered list of all known tracks for a session
///
/// Indices are stable for the lifetime of a session; the playback queue
/// starts as a copy of the catalog and may grow past it when search results
/// from a broader set are promoted, but the catalog itself never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog from already-normalized tracks
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse a Track Catalog Document
    ///
    /// The document is a JSON array of `{title, artist, src, albumArt?}`
    /// objects. Missing titles and artists receive defaults at this point;
    /// an entry without `src` fails the whole load.
    pub fn from_json(document: &str) -> Result<Self> {
        let raw: Vec<RawTrack> = serde_json::from_str(document)?;
        let tracks = raw
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.normalize(i + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tracks })
    }

    /// Read and parse a catalog document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let document = std::fs::read_to_string(path)?;
        Self::from_json(&document)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in catalog order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Tracks matching `predicate`, with their original indices, in
    /// catalog order
    pub fn filter<P>(&self, mut predicate: P) -> Vec<(usize, &Track)>
    where
        P: FnMut(&Track) -> bool,
    {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| predicate(track))
            .collect()
    }

    /// Group tracks by primary artist name
    ///
    /// Keys are raw primary names (text before the first `/`, trimmed);
    /// artists appear in order of first appearance, tracks in catalog
    /// order. Consumed by the artist page generator.
    pub fn group_by_artist(&self) -> Vec<(String, Vec<&Track>)> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<&Track>> = HashMap::new();

        for track in &self.tracks {
            let key = track.primary_artist().to_string();
            if !groups.contains_key(&key) {
                order.push(key.clone());
            }
            groups.entry(key).or_default().push(track);
        }

        order
            .into_iter()
            .map(|name| {
                let tracks = groups.remove(&name).unwrap_or_default();
                (name, tracks)
            })
            .collect()
    }
}
