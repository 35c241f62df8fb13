//! Aria Player - Playback core
//!
//! Platform-agnostic playback session for Aria Player.
//!
//! This crate provides:
//! - The transport state machine (load/play/pause/next/previous)
//! - Shuffle order generation (unbiased Fisher-Yates)
//! - Repeat modes (Off, One, All)
//! - Debounced catalog search with result promotion
//! - Volume and seek control with clamping
//! - A typed command/event contract for presentation layers
//!
//! # Architecture
//!
//! `aria-playback` is completely platform-agnostic: no DOM, no audio
//! backend, no async runtime. The single mutable audio resource is driven
//! through the [`AudioSink`] trait and reports its asynchronous
//! completions back as [`SinkEvent`]s; timers (search debounce, load
//! timeout) run off an injected [`Clock`]. Everything the session does is
//! observable through drained [`SessionEvent`]s, so the core is unit
//! testable without a rendering environment.
//!
//! Loads race: a track switch can be issued while the previous load is
//! still in flight. Every load is stamped with a generation number, every
//! completion carries one, and stale completions are discarded.
//!
//! # Example
//!
//! ```rust
//! use aria_core::Catalog;
//! use aria_playback::{AudioSink, Command, Player, SessionConfig, SinkError, SinkEvent};
//! use std::time::Duration;
//!
//! // Implement AudioSink for your platform
//! struct NullSink {
//!     generation: u64,
//! }
//!
//! impl AudioSink for NullSink {
//!     fn load(&mut self, _src: &str, generation: u64) {
//!         // Real platforms kick off an async load here
//!         self.generation = generation;
//!     }
//!     fn play(&mut self) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position: Duration) {}
//!     fn set_volume(&mut self, _level: u8) {}
//! }
//!
//! let catalog = Catalog::from_json(
//!     r#"[{ "title": "Song1", "artist": "Artist1", "src": "media/1.mp3" }]"#,
//! )
//! .expect("valid document");
//!
//! let mut player = Player::new(
//!     catalog,
//!     Box::new(NullSink { generation: 0 }),
//!     &SessionConfig::default(),
//! );
//!
//! player.dispatch(Command::LoadTrack { index: 0 });
//!
//! // The platform reports the decode finishing:
//! player.handle_sink_event(SinkEvent::Loaded {
//!     generation: 1,
//!     duration: Duration::from_secs(180),
//! });
//!
//! assert_eq!(player.session().current_index(), Some(0));
//! for event in player.drain_events() {
//!     // Render from the event payloads
//!     let _ = event;
//! }
//! ```

mod clock;
mod error;
mod events;
mod player;
mod search;
mod session;
mod shuffle;
mod sink;
pub mod types;

// Public exports
pub use clock::{Clock, SystemClock};
pub use error::{Result, SessionError};
pub use events::SessionEvent;
pub use player::{Command, Player};
pub use search::SearchOverlay;
pub use session::PlaybackSession;
pub use shuffle::ShuffleOrder;
pub use sink::{AudioSink, SinkError, SinkEvent};
pub use types::{RepeatMode, SessionConfig, TransportState};
