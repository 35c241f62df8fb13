//! Core types for the playback session

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Loop the current track only
    One,

    /// Loop the entire queue
    All,
}

impl RepeatMode {
    /// Next mode in the cycle off → one → all → off
    pub fn cycled(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }
}

/// Transport state machine
///
/// Track-end is an event feeding a transition, never a resident state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// No tracks available
    Empty,

    /// Tracks known, none selected
    Idle,

    /// A load is in flight for the given queue index
    Loading { index: usize },

    /// A track is bound and decodable
    Ready { index: usize, playing: bool },
}

impl TransportState {
    /// Queue index the transport is bound to, if any
    pub fn current_index(self) -> Option<usize> {
        match self {
            Self::Loading { index } | Self::Ready { index, .. } => Some(index),
            Self::Empty | Self::Idle => None,
        }
    }

    /// Whether audio is currently playing
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Ready { playing: true, .. })
    }

    /// Whether a load is in flight
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Initial volume (0-100, default: 100)
    pub volume: u8,

    /// Debounce interval for search recomputation (default: 300ms)
    pub search_debounce: Duration,

    /// Maximum time a track load may stay in flight before a
    /// `LoadTimeout` is reported (default: 15s)
    pub load_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            volume: 100,
            search_debounce: Duration::from_millis(300),
            load_timeout: Duration::from_secs(15),
        }
    }
}
