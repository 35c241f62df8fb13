//! Audio sink abstraction
//!
//! Abstracts the single mutable audio resource the session drives: an HTML
//! audio element behind a WASM bridge, a native output, or a test double.
//! The session owns the sink exclusively; no other component touches it.
//!
//! Loads complete asynchronously. Every operation the session issues is
//! stamped with a generation number, and every completion the platform
//! reports back carries the generation of the load that produced it, so a
//! superseded load can never clobber the current track.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Reason a sink refused to start playback (e.g. a user-gesture policy)
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{0}")]
pub struct SinkError(pub String);

impl SinkError {
    /// Create a rejection reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Platform-agnostic handle to the audio resource
pub trait AudioSink {
    /// Bind the resource to `src` and begin an asynchronous load
    ///
    /// Cancellation of a previous load is best-effort: the platform may
    /// still deliver a completion for it, carrying the old generation.
    /// Completion for this load (success or failure) must be delivered
    /// back as a [`SinkEvent`] carrying `generation`.
    fn load(&mut self, src: &str, generation: u64);

    /// Start playback of the bound track
    ///
    /// May be refused by the platform (autoplay restrictions); the session
    /// reports the refusal and does not retry.
    fn play(&mut self) -> Result<(), SinkError>;

    /// Pause playback; pausing a paused resource is a no-op
    fn pause(&mut self);

    /// Move the play head
    fn seek(&mut self, position: Duration);

    /// Set output volume (0-100)
    fn set_volume(&mut self, level: u8);
}

/// Asynchronous completions reported by the audio resource
///
/// The platform forwards these into
/// [`Player::handle_sink_event`](crate::Player::handle_sink_event);
/// completions whose generation is stale are discarded there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkEvent {
    /// Decode metadata finished; the track is ready
    Loaded { generation: u64, duration: Duration },

    /// The load failed (decode error, missing file, interrupted fetch)
    Failed { generation: u64, reason: String },

    /// End of media reached
    Ended { generation: u64 },

    /// Periodic play-head update
    Progress { generation: u64, position: Duration },
}
