//! Playback session - the transport state machine
//!
//! Owns the working queue, the shuffle order, repeat mode, and the audio
//! sink, and decides for every command and resource callback which track is
//! bound and what the transport state is.
//!
//! Every load bumps a monotonically increasing generation number; sink
//! completions carry the generation of the load that produced them and
//! stale ones are discarded, so a superseded load can never clobber the
//! current track.

use crate::clock::Clock;
use crate::error::{Result, SessionError};
use crate::events::SessionEvent;
use crate::shuffle::ShuffleOrder;
use crate::sink::{AudioSink, SinkEvent};
use crate::types::{RepeatMode, SessionConfig, TransportState};
use aria_core::Track;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Transport state machine over a single audio sink
pub struct PlaybackSession {
    sink: Box<dyn AudioSink>,
    clock: Arc<dyn Clock>,

    /// Working queue: the catalog in document order, plus any tracks
    /// appended by promoting foreign search results
    queue: Vec<Track>,

    state: TransportState,
    repeat: RepeatMode,
    shuffle: Option<ShuffleOrder>,
    volume: u8,
    position: Duration,
    duration: Duration,

    /// Generation of the most recent load; stamps all sink traffic
    generation: u64,

    /// Start playback as soon as the in-flight load becomes ready
    play_when_ready: bool,

    load_started: Option<Instant>,
    load_timeout: Duration,

    pending_events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create a session over `tracks` driving `sink`
    pub fn new(tracks: Vec<Track>, sink: Box<dyn AudioSink>, config: &SessionConfig) -> Self {
        Self::with_clock(tracks, sink, config, Arc::new(crate::clock::SystemClock))
    }

    /// Create a session with an injected clock (deterministic tests)
    pub fn with_clock(
        tracks: Vec<Track>,
        mut sink: Box<dyn AudioSink>,
        config: &SessionConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = if tracks.is_empty() {
            TransportState::Empty
        } else {
            TransportState::Idle
        };

        let volume = config.volume.min(100);
        sink.set_volume(volume);

        Self {
            sink,
            clock,
            queue: tracks,
            state,
            repeat: RepeatMode::Off,
            shuffle: None,
            volume,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            generation: 0,
            play_when_ready: false,
            load_started: None,
            load_timeout: config.load_timeout,
            pending_events: Vec::new(),
        }
    }

    // ===== Transport Control =====

    /// Bind the sink to the track at `index` and begin loading it
    ///
    /// Supersedes any in-flight load. A previously playing track is paused
    /// before the switch so audio never overlaps. The session ends up in
    /// `Loading`; readiness arrives later as a sink event.
    pub fn load_track(&mut self, index: usize) -> Result<()> {
        if index >= self.queue.len() {
            let err = SessionError::IndexOutOfRange {
                index,
                len: self.queue.len(),
            };
            tracing::warn!(index, len = self.queue.len(), "rejected track load");
            return Err(err);
        }

        if self.state.is_playing() {
            self.sink.pause();
        }

        self.generation += 1;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        self.play_when_ready = false;
        self.load_started = Some(self.clock.now());
        self.state = TransportState::Loading { index };
        self.sink.load(&self.queue[index].src, self.generation);

        tracing::debug!(index, generation = self.generation, "loading track");
        self.emit_state_changed();
        Ok(())
    }

    /// Load the track at `index` and start playback once it is ready
    pub fn load_and_play(&mut self, index: usize) -> Result<()> {
        self.load_track(index)?;
        self.play_when_ready = true;
        Ok(())
    }

    /// Start or resume playback
    ///
    /// Rejected while a load is in flight; a platform refusal (autoplay
    /// policy) is reported as a `PlaybackRejected` event and the playing
    /// flag keeps its pre-call value.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            TransportState::Loading { .. } => {
                tracing::warn!("play ignored while a track is loading");
                Err(SessionError::Busy)
            }
            TransportState::Empty | TransportState::Idle => {
                tracing::warn!("play ignored with no track loaded");
                Err(SessionError::NoTrackLoaded)
            }
            TransportState::Ready { playing: true, .. } => Ok(()),
            TransportState::Ready {
                index,
                playing: false,
            } => match self.sink.play() {
                Ok(()) => {
                    self.state = TransportState::Ready {
                        index,
                        playing: true,
                    };
                    self.emit_state_changed();
                    Ok(())
                }
                Err(rejection) => {
                    let err = SessionError::PlaybackRejected(rejection.0);
                    tracing::error!(error = %err, "audio sink rejected play");
                    self.emit_error(err.clone());
                    Err(err)
                }
            },
        }
    }

    /// Pause playback; a no-op unless currently playing
    pub fn pause(&mut self) {
        if let TransportState::Ready {
            index,
            playing: true,
        } = self.state
        {
            self.sink.pause();
            self.state = TransportState::Ready {
                index,
                playing: false,
            };
            self.emit_state_changed();
        }
    }

    /// Toggle between playing and paused
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.state.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Advance to the next track in play order and play it
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        self.step(1)
    }

    /// Go back to the previous track in play order and play it
    pub fn previous(&mut self) -> Result<()> {
        self.step(-1)
    }

    fn step(&mut self, delta: i64) -> Result<()> {
        if self.queue.is_empty() {
            tracing::warn!("transport step ignored with an empty queue");
            return Err(SessionError::NoTrackLoaded);
        }

        let target = match self.state.current_index() {
            None => 0,
            Some(current) => self.neighbour_of(current, delta),
        };

        self.load_and_play(target)
    }

    /// Target of a ±1 step from `current`, honouring the shuffle order
    ///
    /// When the shuffle order has lost track of `current`, reports a
    /// `ShuffleDesync` and falls back to deterministic catalog stepping.
    fn neighbour_of(&mut self, current: usize, delta: i64) -> usize {
        if let Some(order) = &self.shuffle {
            match order.step_from(current, delta) {
                Some(target) => return target,
                None => {
                    tracing::warn!(current, "current track missing from shuffle order");
                    self.emit_error(SessionError::ShuffleDesync);
                }
            }
        }

        let len = self.queue.len() as i64;
        (current as i64 + delta).rem_euclid(len) as usize
    }

    // ===== Sink Completions =====

    /// Process an asynchronous completion from the audio resource
    ///
    /// Completions stamped with a superseded generation are discarded.
    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::Loaded {
                generation,
                duration,
            } => {
                if self.is_current(generation) {
                    self.handle_loaded(duration);
                }
            }
            SinkEvent::Failed { generation, reason } => {
                if self.is_current(generation) {
                    self.handle_failed(reason);
                }
            }
            SinkEvent::Ended { generation } => {
                if self.is_current(generation) {
                    self.handle_ended();
                }
            }
            SinkEvent::Progress {
                generation,
                position,
            } => {
                if self.is_current(generation) {
                    self.handle_progress(position);
                }
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation == self.generation {
            true
        } else {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale sink completion"
            );
            false
        }
    }

    fn handle_loaded(&mut self, duration: Duration) {
        let TransportState::Loading { index } = self.state else {
            tracing::debug!("loaded signal outside of a load");
            return;
        };

        self.duration = duration;
        self.load_started = None;
        self.state = TransportState::Ready {
            index,
            playing: false,
        };

        let track = self.queue[index].clone();
        self.pending_events.push(SessionEvent::TrackLoaded {
            index,
            track,
            duration,
        });
        self.emit_state_changed();

        if self.play_when_ready {
            self.play_when_ready = false;
            // A rejection is already reported as an event inside play()
            let _ = self.play();
        }
    }

    fn handle_failed(&mut self, reason: String) {
        let TransportState::Loading { index } = self.state else {
            tracing::debug!("load failure outside of a load");
            return;
        };

        self.load_started = None;
        self.play_when_ready = false;
        self.state = TransportState::Idle;

        let err = SessionError::Load { index, reason };
        tracing::error!(error = %err, "track failed to load");
        self.emit_error(err);
        self.emit_state_changed();
    }

    /// End-of-media transition, dispatched on repeat mode
    ///
    /// Shuffle continues past the end of the queue regardless of repeat
    /// mode, matching the long-standing player contract.
    fn handle_ended(&mut self) {
        let TransportState::Ready { index, .. } = self.state else {
            tracing::debug!("ended signal without a ready track");
            return;
        };

        // Media ended, so the resource is no longer playing
        self.state = TransportState::Ready {
            index,
            playing: false,
        };
        self.position = Duration::ZERO;

        match self.repeat {
            RepeatMode::One => {
                self.sink.seek(Duration::ZERO);
                let _ = self.play();
            }
            RepeatMode::All => {
                let _ = self.next();
            }
            RepeatMode::Off => {
                if self.shuffle.is_some() || !self.is_last_in_order(index) {
                    let _ = self.next();
                } else {
                    // End of queue: stop without advancing
                    self.emit_state_changed();
                }
            }
        }
    }

    fn handle_progress(&mut self, position: Duration) {
        self.position = position;
        self.pending_events.push(SessionEvent::ProgressUpdated {
            position,
            duration: self.duration,
        });
    }

    /// Whether `index` is the final entry of the current play order
    fn is_last_in_order(&self, index: usize) -> bool {
        match &self.shuffle {
            Some(order) => order
                .position_of(index)
                .map_or(index + 1 == self.queue.len(), |p| p + 1 == order.len()),
            None => index + 1 == self.queue.len(),
        }
    }

    /// Enforce the load timeout; host code calls this periodically
    ///
    /// A timed-out load is retired (its generation can no longer complete)
    /// and reported; the session returns to `Idle` and stays usable.
    pub fn tick(&mut self) {
        let TransportState::Loading { index } = self.state else {
            return;
        };
        let Some(started) = self.load_started else {
            return;
        };

        if self.clock.now().duration_since(started) >= self.load_timeout {
            self.generation += 1;
            self.load_started = None;
            self.play_when_ready = false;
            self.state = TransportState::Idle;

            let err = SessionError::LoadTimeout {
                index,
                timeout: self.load_timeout,
            };
            tracing::error!(error = %err, "track load timed out");
            self.emit_error(err);
            self.emit_state_changed();
        }
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle mode; returns the new state
    ///
    /// Enabling generates a fresh order over the current queue length,
    /// including any promoted tracks. Disabling just drops the order.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = match self.shuffle {
            Some(_) => None,
            None => Some(ShuffleOrder::generate(self.queue.len())),
        };
        tracing::debug!(enabled = self.shuffle.is_some(), "shuffle toggled");
        self.shuffle.is_some()
    }

    /// Cycle repeat mode off → one → all → off; returns the new mode
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycled();
        tracing::debug!(mode = ?self.repeat, "repeat toggled");
        self.repeat
    }

    // ===== Volume & Seek =====

    /// Set output volume; out-of-range input is clamped to 100
    pub fn set_volume(&mut self, level: u8) {
        self.volume = level.min(100);
        self.sink.set_volume(self.volume);
    }

    /// Seek to a position in the current track; clamped to the duration
    pub fn seek(&mut self, position: Duration) {
        let clamped = position.min(self.duration);
        self.position = clamped;
        self.sink.seek(clamped);
    }

    /// Seek by fraction of the track duration; clamped to 0.0..=1.0
    pub fn seek_percent(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.seek(self.duration.mul_f32(fraction));
    }

    // ===== Queue =====

    /// Append a track to the working queue, returning its index
    ///
    /// Used when promoting a search result whose `src` is not in the
    /// queue. An active shuffle order is extended to keep covering every
    /// index.
    pub fn enqueue(&mut self, track: Track) -> usize {
        let index = self.queue.len();
        self.queue.push(track);

        if self.state == TransportState::Empty {
            self.state = TransportState::Idle;
        }
        if let Some(order) = &mut self.shuffle {
            order.push(index);
        }

        tracing::debug!(index, "track appended to queue");
        index
    }

    // ===== State Queries =====

    /// Current transport state
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Queue index the transport is bound to, if any
    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    /// Track the transport is bound to, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index().and_then(|i| self.queue.get(i))
    }

    /// Current repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether shuffle is active
    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle.is_some()
    }

    /// The active shuffle order, if shuffle is on
    pub fn shuffle_order(&self) -> Option<&ShuffleOrder> {
        self.shuffle.as_ref()
    }

    /// Current volume (0-100)
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Play-head position within the current track
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Duration of the current track (zero until metadata is decoded)
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The working queue in play-order-independent index order
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Working queue length
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    // ===== Events =====

    /// Drain all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit_state_changed(&mut self) {
        self.pending_events
            .push(SessionEvent::PlaybackStateChanged { state: self.state });
    }

    fn emit_error(&mut self, error: SessionError) {
        self.pending_events.push(SessionEvent::Error { error });
    }
}
