//! aria-pages - static artist page generator
//!
//! Reads the catalog document and the artist metadata document, groups
//! tracks by primary artist, and writes one HTML page per artist under
//! `<out>/<slug>/<slug>.html`. Artists missing from the metadata document
//! get default entries, and the updated document is written back so the
//! defaults can be hand-edited later.

use anyhow::Context;
use aria_core::{artist_slug, ArtistDirectory, ArtistInfo, Catalog, Track};
use clap::Parser;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aria-pages")]
#[command(about = "Generate static artist pages from the Aria Player catalog", long_about = None)]
struct Cli {
    /// Catalog document to read
    #[arg(short, long, default_value = "./songs.json")]
    songs: PathBuf,

    /// Artist metadata document (created if missing)
    #[arg(short = 'i', long, default_value = "./artistInfo.json")]
    artist_info: PathBuf,

    /// Output directory for the generated pages
    #[arg(short, long, default_value = "./artists")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aria_pages=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let catalog = Catalog::load(&cli.songs)
        .with_context(|| format!("loading {}", cli.songs.display()))?;
    let mut directory = load_artist_directory(&cli.artist_info);

    let pages = generate_pages(&catalog, &mut directory, &cli.out)?;

    let document = serde_json::to_string_pretty(&directory)?;
    std::fs::write(&cli.artist_info, document)
        .with_context(|| format!("writing {}", cli.artist_info.display()))?;

    tracing::info!(pages, out = %cli.out.display(), "artist pages written");
    Ok(())
}

/// Read the artist metadata document, tolerating a missing or broken file
fn load_artist_directory(path: &Path) -> ArtistDirectory {
    match std::fs::read_to_string(path) {
        Ok(document) => match serde_json::from_str(&document) {
            Ok(directory) => directory,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "artist info unparsable, starting fresh");
                ArtistDirectory::new()
            }
        },
        Err(error) => {
            tracing::info!(path = %path.display(), %error, "no artist info document, starting fresh");
            ArtistDirectory::new()
        }
    }
}

/// Write one page per artist group; returns the number of pages written
///
/// Artists without a metadata entry get the defaults recorded into
/// `directory` so the caller can persist them.
fn generate_pages(
    catalog: &Catalog,
    directory: &mut ArtistDirectory,
    out: &Path,
) -> anyhow::Result<usize> {
    let groups = catalog.group_by_artist();
    let count = groups.len();

    for (artist, tracks) in groups {
        let info = directory.entry(artist.clone()).or_insert_with(|| {
            tracing::info!(%artist, "no metadata entry, using defaults");
            ArtistInfo::default()
        });

        let slug = artist_slug(&artist);
        let page_dir = out.join(&slug);
        std::fs::create_dir_all(&page_dir)
            .with_context(|| format!("creating {}", page_dir.display()))?;

        let page_path = page_dir.join(format!("{slug}.html"));
        std::fs::write(&page_path, render_page(&artist, info, &tracks))
            .with_context(|| format!("writing {}", page_path.display()))?;

        tracing::debug!(%artist, page = %page_path.display(), "page written");
    }

    Ok(count)
}

/// Render one artist page
fn render_page(artist: &str, info: &ArtistInfo, tracks: &[&Track]) -> String {
    let artist = html_escape(artist);

    let mut cards = String::new();
    for track in tracks {
        let art = track.album_art.as_deref().unwrap_or("../default-album.jpg");
        let _ = write!(
            cards,
            r#"
                <div class="song-card" data-src="{src}">
                    <img src="{art}" alt="{title}">
                    <div class="song-info">
                        <h3>{title}</h3>
                        <p>{track_artist}</p>
                    </div>
                </div>"#,
            src = html_escape(&track.src),
            art = html_escape(art),
            title = html_escape(&track.title),
            track_artist = html_escape(&track.artist),
        );
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{artist} - Artist Page</title>
    <link rel="stylesheet" href="../styles.css">
</head>
<body>
    <div class="container">
        <div class="sidebar">
            <h2>Menu</h2>
            <ul>
                <li><a href="/main.html">Home</a></li>
                <li><a href="#">My Playlist</a></li>
                <li><a href="#">Favorites</a></li>
            </ul>
        </div>
        <div class="main-content">
            <div class="artist-header" style="background-image: url('{header}')">
                <h1>{artist}</h1>
                <p>{genre}</p>
            </div>
            <div class="artist-info">
                <div class="artist-description">
                    <h2>About {artist}</h2>
                    <p>{description}</p>
                </div>
                <div class="artist-stats">
                    <h3>Stats</h3>
                    <p>Followers: {followers}</p>
                    <p>Monthly Listeners: {listeners}</p>
                </div>
            </div>
            <h2>Top Tracks</h2>
            <div id="track-list" class="track-list">{cards}
            </div>
        </div>
    </div>
</body>
</html>
"##,
        header = html_escape(&info.header_image),
        genre = html_escape(&info.genre),
        description = html_escape(&info.description),
        followers = html_escape(&info.followers),
        listeners = html_escape(&info.monthly_listeners),
    )
}

/// Minimal HTML escaping for text and attribute positions
fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
