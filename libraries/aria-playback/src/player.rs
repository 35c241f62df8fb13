//! Player - the presentation-adapter surface
//!
//! Routes UI commands into the session and the search overlay, and exposes
//! their state changes as a single drained event stream. This is the only
//! type a host embedding the core needs to hold.

use crate::clock::{Clock, SystemClock};
use crate::events::SessionEvent;
use crate::search::SearchOverlay;
use crate::session::PlaybackSession;
use crate::sink::{AudioSink, SinkEvent};
use crate::types::SessionConfig;
use aria_core::Catalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Commands accepted from the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    LoadTrack { index: usize },
    Play,
    Pause,
    TogglePlay,
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    SetVolume { level: u8 },
    Seek { position: Duration },
    SeekPercent { fraction: f32 },
    SetQuery { text: String },
    Promote { result_index: usize },
}

/// The assembled playback core: catalog, session, and search overlay
pub struct Player {
    catalog: Catalog,
    session: PlaybackSession,
    search: SearchOverlay,
}

impl Player {
    /// Create a player over `catalog`, driving `sink`
    pub fn new(catalog: Catalog, sink: Box<dyn AudioSink>, config: &SessionConfig) -> Self {
        Self::with_clock(catalog, sink, config, Arc::new(SystemClock))
    }

    /// Create a player with an injected clock (deterministic tests)
    pub fn with_clock(
        catalog: Catalog,
        sink: Box<dyn AudioSink>,
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session = PlaybackSession::with_clock(
            catalog.tracks().to_vec(),
            sink,
            config,
            Arc::clone(&clock),
        );
        let search = SearchOverlay::new(config.search_debounce, clock);

        Self {
            catalog,
            session,
            search,
        }
    }

    /// Route a presentation-layer command
    ///
    /// Command failures are non-fatal: they are logged by the session and,
    /// where user-visible, surfaced through the event stream, so dispatch
    /// itself never fails.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::LoadTrack { index } => {
                let _ = self.session.load_track(index);
            }
            Command::Play => {
                let _ = self.session.play();
            }
            Command::Pause => self.session.pause(),
            Command::TogglePlay => {
                let _ = self.session.toggle_play();
            }
            Command::Next => {
                let _ = self.session.next();
            }
            Command::Previous => {
                let _ = self.session.previous();
            }
            Command::ToggleShuffle => {
                self.session.toggle_shuffle();
            }
            Command::ToggleRepeat => {
                self.session.toggle_repeat();
            }
            Command::SetVolume { level } => self.session.set_volume(level),
            Command::Seek { position } => self.session.seek(position),
            Command::SeekPercent { fraction } => self.session.seek_percent(fraction),
            Command::SetQuery { text } => self.search.set_query(&text),
            Command::Promote { result_index } => self.promote(result_index),
        }
    }

    /// Promote a search result into the playback queue and play it
    ///
    /// The result is resolved by `src` against the working queue: a known
    /// track targets its existing index, a foreign one (result set drawn
    /// from a broader superset) is appended. The overlay is cleared and
    /// hidden either way.
    pub fn promote(&mut self, result_index: usize) {
        let Some(track) = self.search.result(result_index).cloned() else {
            tracing::warn!(result_index, "promote ignored: no such search result");
            return;
        };

        let index = match self
            .session
            .queue()
            .iter()
            .position(|t| t.src == track.src)
        {
            Some(existing) => existing,
            None => self.session.enqueue(track),
        };

        let _ = self.session.load_and_play(index);
        self.search.clear();
    }

    /// Forward an asynchronous completion from the audio resource
    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        self.session.handle_sink_event(event);
    }

    /// Drive time-based behaviour: search debounce and load timeout
    pub fn tick(&mut self) {
        self.session.tick();
        self.search.poll(&self.catalog);
    }

    /// Drain all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut events = self.session.drain_events();
        events.extend(self.search.drain_events());
        events
    }

    /// The immutable catalog this player was built over
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The playback session
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// The search overlay
    pub fn search(&self) -> &SearchOverlay {
        &self.search
    }
}
