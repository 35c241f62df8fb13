//! Error types for the playback session

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Playback session errors
///
/// None of these are fatal to the session: each is logged, surfaced as a
/// [`crate::SessionEvent::Error`] where user-visible, and leaves the
/// session usable. Catalog load failure, the one fatal condition, is
/// reported by `aria-core` before a session exists.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SessionError {
    /// Requested index is outside the working queue
    #[error("track index {index} out of range for queue of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The bound track failed to decode or fetch
    #[error("track {index} failed to load: {reason}")]
    Load { index: usize, reason: String },

    /// The bound track did not become ready within the configured timeout
    #[error("track {index} load timed out after {timeout:?}")]
    LoadTimeout { index: usize, timeout: Duration },

    /// The platform refused to start playback (e.g. an autoplay policy)
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// The shuffle order no longer covers the current track
    #[error("shuffle order out of sync with queue")]
    ShuffleDesync,

    /// Transport command with no track selected
    #[error("no track loaded")]
    NoTrackLoaded,

    /// Transport command while a load is in flight
    #[error("busy loading a track")]
    Busy,
}
