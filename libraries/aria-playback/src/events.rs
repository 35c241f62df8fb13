//! Session events for presentation-adapter synchronization
//!
//! The presentation layer drains these after each command or sink callback
//! and renders from the payloads. No other coupling to rendering technology
//! is assumed.

use crate::error::SessionError;
use crate::types::TransportState;
use aria_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the playback core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A track finished loading and is ready to play
    TrackLoaded {
        /// Queue index the track was loaded at
        index: usize,
        /// The loaded track's metadata
        track: Track,
        /// Decoded media duration
        duration: Duration,
    },

    /// The transport state changed (loading, playing, paused, idle)
    PlaybackStateChanged {
        /// The new transport state
        state: TransportState,
    },

    /// The play head advanced
    ProgressUpdated {
        position: Duration,
        duration: Duration,
    },

    /// The search result set changed
    ///
    /// `visible: false` doubles as the "hide overlay" signal for an empty
    /// query or a promoted result.
    SearchResultsChanged {
        results: Vec<Track>,
        visible: bool,
    },

    /// A non-fatal error was reported
    Error { error: SessionError },
}
