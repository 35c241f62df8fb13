//! Aria Player - Catalog model
//!
//! Data model shared by the playback core and the batch tools:
//! - Track records and their load-time normalization
//! - The Track Catalog Document (`songs.json`) parser
//! - Catalog views: ordered filtering and grouping by primary artist
//! - The artist metadata document (`artistInfo.json`) and the canonical
//!   artist-name slug used for page directories and links
//!
//! The catalog is immutable after load. Playback state lives in
//! `aria-playback`; this crate knows nothing about transport or audio.
//!
//! # Example
//!
//! ```rust
//! use aria_core::Catalog;
//!
//! let document = r#"[
//!     { "title": "First Light", "artist": "Mono Culture", "src": "media/first-light.mp3" },
//!     { "src": "media/untitled.mp3" }
//! ]"#;
//!
//! let catalog = Catalog::from_json(document).expect("valid document");
//! assert_eq!(catalog.len(), 2);
//! // Missing metadata is defaulted once, at load time.
//! assert_eq!(catalog.get(1).unwrap().title, "Track 2");
//! assert_eq!(catalog.get(1).unwrap().artist, "Unknown Artist");
//! ```

pub mod artist;
pub mod catalog;
pub mod error;
pub mod track;

pub use artist::{artist_slug, ArtistDirectory, ArtistInfo};
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use track::Track;
