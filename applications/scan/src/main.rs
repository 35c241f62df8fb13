//! aria-scan - builds the catalog document from a media directory
//!
//! Walks a directory of audio files, extracts tags and embedded album art,
//! and writes the Track Catalog Document (`songs.json`) the player and the
//! page generator consume. Files whose tags cannot be read still get a
//! catalog entry with the standard defaults.

use anyhow::Context;
use aria_core::Track;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use lofty::{PictureType, TaggedFileExt};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

/// Audio file extensions accepted into the catalog
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "m4a", "wav"];

#[derive(Parser)]
#[command(name = "aria-scan")]
#[command(about = "Build the Aria Player catalog from a media directory", long_about = None)]
struct Cli {
    /// Directory containing the audio files
    #[arg(short, long, default_value = "./media")]
    media: PathBuf,

    /// Catalog document to write
    #[arg(short, long, default_value = "./songs.json")]
    output: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aria_scan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let tracks = scan_media(&cli.media, cli.recursive)
        .with_context(|| format!("scanning {}", cli.media.display()))?;

    let document = serde_json::to_string_pretty(&tracks)?;
    std::fs::write(&cli.output, document)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    tracing::info!(
        tracks = tracks.len(),
        output = %cli.output.display(),
        "catalog document written"
    );
    Ok(())
}

/// Collect catalog entries for every audio file under `media`
///
/// Files are visited in path order so repeated scans of the same directory
/// produce the same document.
fn scan_media(media: &Path, recursive: bool) -> anyhow::Result<Vec<Track>> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(media)
        .max_depth(max_depth)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();

    let tracks = files
        .iter()
        .enumerate()
        .map(|(i, path)| read_track(path, i + 1))
        .collect();

    Ok(tracks)
}

/// Whether `path` has one of the accepted audio extensions
fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Build a catalog entry for one file
///
/// Unreadable tags are not fatal: the entry falls back to the same
/// defaults the catalog loader applies.
fn read_track(path: &Path, ordinal: usize) -> Track {
    let src = path.to_string_lossy().into_owned();

    match read_tags(path) {
        Ok((title, artist, album_art)) => {
            Track::from_partial(title, artist, src, album_art, ordinal)
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "could not read tags");
            Track::from_partial(None, None, src, None, ordinal)
        }
    }
}

type ReadTags = (Option<String>, Option<String>, Option<String>);

/// Extract title, artist, and album art (as a data URI) from a file's tags
fn read_tags(path: &Path) -> anyhow::Result<ReadTags> {
    let tagged_file = lofty::read_from_path(path)?;

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return Ok((None, None, None));
    };

    let mut title = None;
    let mut artist = None;
    for item in tag.items() {
        match item.key() {
            lofty::ItemKey::TrackTitle => {
                title = item.value().text().map(ToString::to_string);
            }
            lofty::ItemKey::TrackArtist => {
                artist = item.value().text().map(ToString::to_string);
            }
            _ => {}
        }
    }

    // Prefer the front cover, otherwise use the first embedded picture
    let album_art = tag
        .pictures()
        .iter()
        .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
        .or_else(|| tag.pictures().first())
        .map(|picture| {
            let mime_type = picture
                .mime_type()
                .map_or("image/jpeg", |m| m.as_str());
            format!("data:{};base64,{}", mime_type, STANDARD.encode(picture.data()))
        });

    Ok((title, artist, album_art))
}
