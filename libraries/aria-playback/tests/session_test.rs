//! Integration tests for the playback core
//!
//! Drives the assembled player through real user scenarios: transport
//! navigation, track-end handling, racing loads, search, and promotion.

use aria_core::{Catalog, Track};
use aria_playback::{
    AudioSink, Clock, Command, Player, RepeatMode, SessionConfig, SessionError, SessionEvent,
    SinkError, SinkEvent, TransportState,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ===== Test Helpers =====

/// Everything the session asked the audio resource to do
#[derive(Default)]
struct SinkLog {
    loads: Vec<(String, u64)>,
    plays: usize,
    pauses: usize,
    seeks: Vec<Duration>,
    volumes: Vec<u8>,
    reject_play: bool,
}

/// Mock audio sink recording calls for inspection
struct MockSink {
    log: Arc<Mutex<SinkLog>>,
}

impl MockSink {
    fn new() -> (Self, Arc<Mutex<SinkLog>>) {
        let log = Arc::new(Mutex::new(SinkLog::default()));
        (Self { log: Arc::clone(&log) }, log)
    }
}

impl AudioSink for MockSink {
    fn load(&mut self, src: &str, generation: u64) {
        self.log.lock().unwrap().loads.push((src.to_string(), generation));
    }

    fn play(&mut self) -> Result<(), SinkError> {
        let mut log = self.log.lock().unwrap();
        if log.reject_play {
            return Err(SinkError::new("autoplay blocked"));
        }
        log.plays += 1;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().pauses += 1;
    }

    fn seek(&mut self, position: Duration) {
        self.log.lock().unwrap().seeks.push(position);
    }

    fn set_volume(&mut self, level: u8) {
        self.log.lock().unwrap().volumes.push(level);
    }
}

/// Manually advanced clock for deterministic deadline tests
struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap()
    }
}

fn two_track_catalog() -> Catalog {
    Catalog::from_tracks(vec![
        Track::new("Song1", "Artist1", "media/1.mp3"),
        Track::new("Song2", "Artist2", "media/2.mp3"),
    ])
}

fn numbered_catalog(n: usize) -> Catalog {
    Catalog::from_tracks(
        (0..n)
            .map(|i| Track::new(format!("Song{i}"), format!("Artist{i}"), format!("media/{i}.mp3")))
            .collect(),
    )
}

fn player_over(catalog: Catalog) -> (Player, Arc<Mutex<SinkLog>>, Arc<ManualClock>) {
    let (sink, log) = MockSink::new();
    let clock = Arc::new(ManualClock::new());
    let player = Player::with_clock(
        catalog,
        Box::new(sink),
        &SessionConfig::default(),
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    (player, log, clock)
}

fn last_generation(log: &Arc<Mutex<SinkLog>>) -> u64 {
    log.lock().unwrap().loads.last().expect("a load was issued").1
}

/// Deliver a successful decode for the most recent load
fn complete_load(player: &mut Player, log: &Arc<Mutex<SinkLog>>) {
    let generation = last_generation(log);
    player.handle_sink_event(SinkEvent::Loaded {
        generation,
        duration: Duration::from_secs(180),
    });
}

fn deliver_ended(player: &mut Player, log: &Arc<Mutex<SinkLog>>) {
    let generation = last_generation(log);
    player.handle_sink_event(SinkEvent::Ended { generation });
}

// ===== Transport Scenarios =====

#[test]
fn test_load_next_wrap_and_repeat_all_walkthrough() {
    let (mut player, log, _clock) = player_over(two_track_catalog());

    // loadTrack(0) → Ready(0), paused
    player.dispatch(Command::LoadTrack { index: 0 });
    complete_load(&mut player, &log);
    assert_eq!(
        player.session().state(),
        TransportState::Ready { index: 0, playing: false }
    );

    // next() → Ready(1), playing
    player.dispatch(Command::Next);
    complete_load(&mut player, &log);
    assert_eq!(
        player.session().state(),
        TransportState::Ready { index: 1, playing: true }
    );

    // next() with repeat off wraps back to 0
    player.dispatch(Command::Next);
    complete_load(&mut player, &log);
    assert_eq!(player.session().current_index(), Some(0));

    // toggleRepeat twice → All
    player.dispatch(Command::ToggleRepeat);
    player.dispatch(Command::ToggleRepeat);
    assert_eq!(player.session().repeat(), RepeatMode::All);

    // Track end at index 1 advances (wrapping) to index 0
    player.dispatch(Command::Next);
    complete_load(&mut player, &log);
    assert_eq!(player.session().current_index(), Some(1));

    deliver_ended(&mut player, &log);
    complete_load(&mut player, &log);
    assert_eq!(
        player.session().state(),
        TransportState::Ready { index: 0, playing: true }
    );
}

#[test]
fn test_next_then_previous_returns_to_original() {
    let (mut player, log, _clock) = player_over(numbered_catalog(3));

    player.dispatch(Command::LoadTrack { index: 1 });
    complete_load(&mut player, &log);

    player.dispatch(Command::Next);
    complete_load(&mut player, &log);
    assert_eq!(player.session().current_index(), Some(2));

    player.dispatch(Command::Previous);
    complete_load(&mut player, &log);
    assert_eq!(player.session().current_index(), Some(1));
}

#[test]
fn test_previous_wraps_backward_from_first_track() {
    let (mut player, log, _clock) = player_over(numbered_catalog(4));

    player.dispatch(Command::LoadTrack { index: 0 });
    complete_load(&mut player, &log);

    player.dispatch(Command::Previous);
    complete_load(&mut player, &log);
    assert_eq!(player.session().current_index(), Some(3));
}

#[test]
fn test_next_from_idle_starts_at_the_first_track() {
    let (mut player, log, _clock) = player_over(numbered_catalog(3));

    player.dispatch(Command::Next);
    assert_eq!(
        player.session().state(),
        TransportState::Loading { index: 0 }
    );
    complete_load(&mut player, &log);
    assert!(player.session().state().is_playing());
}

#[test]
fn test_out_of_range_load_is_ignored() {
    let (mut player, log, _clock) = player_over(numbered_catalog(3));

    player.dispatch(Command::LoadTrack { index: 5 });
    assert_eq!(player.session().state(), TransportState::Idle);
    assert!(log.lock().unwrap().loads.is_empty());
}

// ===== Shuffle =====

#[test]
fn test_shuffle_cycle_visits_every_track_once() {
    let n = 6;
    let (mut player, log, _clock) = player_over(numbered_catalog(n));

    player.dispatch(Command::LoadTrack { index: 0 });
    complete_load(&mut player, &log);
    player.dispatch(Command::ToggleShuffle);

    let mut visited = Vec::new();
    for _ in 0..n {
        player.dispatch(Command::Next);
        complete_load(&mut player, &log);
        visited.push(player.session().current_index().unwrap());
    }

    let mut unique = visited.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), n, "shuffle cycle repeated a track early");

    // A full lap through the order returns to the starting track
    assert_eq!(visited.last(), Some(&0));
}

#[test]
fn test_track_end_with_shuffle_continues_past_queue_end() {
    let (mut player, log, _clock) = player_over(numbered_catalog(4));

    player.dispatch(Command::ToggleShuffle);
    let order: Vec<usize> = player
        .session()
        .shuffle_order()
        .unwrap()
        .as_slice()
        .to_vec();

    // Play the final track of the shuffle order, repeat off
    let last = *order.last().unwrap();
    player.dispatch(Command::LoadTrack { index: last });
    complete_load(&mut player, &log);
    player.dispatch(Command::Play);

    deliver_ended(&mut player, &log);
    assert_eq!(
        player.session().state(),
        TransportState::Loading { index: order[0] }
    );
}

// ===== Track End =====

#[test]
fn test_track_end_repeat_one_replays_same_index() {
    let (mut player, log, _clock) = player_over(numbered_catalog(3));

    player.dispatch(Command::LoadTrack { index: 1 });
    complete_load(&mut player, &log);
    player.dispatch(Command::Play);
    player.dispatch(Command::ToggleRepeat); // One

    deliver_ended(&mut player, &log);

    assert_eq!(player.session().current_index(), Some(1));
    assert!(player.session().state().is_playing());
    // Replay seeks back to the start instead of reloading
    assert_eq!(log.lock().unwrap().seeks.last(), Some(&Duration::ZERO));
    assert_eq!(log.lock().unwrap().loads.len(), 1);
}

#[test]
fn test_track_end_repeat_off_last_track_stops() {
    let (mut player, log, _clock) = player_over(two_track_catalog());

    player.dispatch(Command::LoadTrack { index: 1 });
    complete_load(&mut player, &log);
    player.dispatch(Command::Play);

    deliver_ended(&mut player, &log);

    assert_eq!(
        player.session().state(),
        TransportState::Ready { index: 1, playing: false }
    );
    assert_eq!(log.lock().unwrap().loads.len(), 1, "must not advance");
}

#[test]
fn test_track_end_repeat_off_mid_queue_advances() {
    let (mut player, log, _clock) = player_over(two_track_catalog());

    player.dispatch(Command::LoadTrack { index: 0 });
    complete_load(&mut player, &log);
    player.dispatch(Command::Play);

    deliver_ended(&mut player, &log);
    complete_load(&mut player, &log);
    assert_eq!(
        player.session().state(),
        TransportState::Ready { index: 1, playing: true }
    );
}

// ===== Racing Loads =====

#[test]
fn test_stale_load_completion_is_discarded() {
    let (mut player, log, _clock) = player_over(numbered_catalog(3));

    player.dispatch(Command::LoadTrack { index: 0 });
    let first_generation = last_generation(&log);

    // Superseded before the first decode finishes
    player.dispatch(Command::LoadTrack { index: 1 });

    player.handle_sink_event(SinkEvent::Loaded {
        generation: first_generation,
        duration: Duration::from_secs(99),
    });
    assert_eq!(
        player.session().state(),
        TransportState::Loading { index: 1 },
        "stale completion must not bind the old track"
    );

    complete_load(&mut player, &log);
    assert_eq!(
        player.session().state(),
        TransportState::Ready { index: 1, playing: false }
    );
}

#[test]
fn test_stale_ended_signal_is_discarded() {
    let (mut player, log, _clock) = player_over(numbered_catalog(3));

    player.dispatch(Command::LoadTrack { index: 0 });
    let first_generation = last_generation(&log);
    player.dispatch(Command::LoadTrack { index: 1 });
    complete_load(&mut player, &log);

    player.handle_sink_event(SinkEvent::Ended {
        generation: first_generation,
    });
    assert_eq!(player.session().current_index(), Some(1));
    assert_eq!(log.lock().unwrap().loads.len(), 2);
}

#[test]
fn test_next_during_load_supersedes_the_inflight_load() {
    let (mut player, log, _clock) = player_over(numbered_catalog(3));

    player.dispatch(Command::LoadTrack { index: 0 });
    player.dispatch(Command::Next); // still loading index 0

    assert_eq!(
        player.session().state(),
        TransportState::Loading { index: 1 }
    );
    complete_load(&mut player, &log);
    assert!(player.session().state().is_playing(), "latest intent wins");
}

#[test]
fn test_load_timeout_reports_and_retires_the_load() {
    let (mut player, log, clock) = player_over(numbered_catalog(2));

    player.dispatch(Command::LoadTrack { index: 0 });
    let generation = last_generation(&log);

    clock.advance(Duration::from_secs(16));
    player.tick();

    assert_eq!(player.session().state(), TransportState::Idle);
    let events = player.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::Error {
            error: SessionError::LoadTimeout { index: 0, .. }
        }
    )));

    // The late completion is stale now
    player.handle_sink_event(SinkEvent::Loaded {
        generation,
        duration: Duration::from_secs(180),
    });
    assert_eq!(player.session().state(), TransportState::Idle);
}

#[test]
fn test_load_failure_reports_and_returns_to_idle() {
    let (mut player, log, _clock) = player_over(numbered_catalog(2));

    player.dispatch(Command::LoadTrack { index: 0 });
    let generation = last_generation(&log);
    player.handle_sink_event(SinkEvent::Failed {
        generation,
        reason: "decode error".to_string(),
    });

    assert_eq!(player.session().state(), TransportState::Idle);
    let events = player.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::Error {
            error: SessionError::Load { index: 0, .. }
        }
    )));

    // The session is still usable
    player.dispatch(Command::LoadTrack { index: 1 });
    complete_load(&mut player, &log);
    assert_eq!(player.session().current_index(), Some(1));
}

#[test]
fn test_play_rejection_surfaces_without_flipping_state() {
    let (mut player, log, _clock) = player_over(numbered_catalog(1));

    player.dispatch(Command::LoadTrack { index: 0 });
    complete_load(&mut player, &log);
    log.lock().unwrap().reject_play = true;

    player.dispatch(Command::Play);

    assert!(!player.session().state().is_playing());
    let events = player.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::Error {
            error: SessionError::PlaybackRejected(_)
        }
    )));
}

// ===== Search & Promotion =====

#[test]
fn test_search_then_promote_resolves_by_src() {
    let (mut player, log, clock) = player_over(two_track_catalog());

    player.dispatch(Command::SetQuery {
        text: "artist1".to_string(),
    });
    clock.advance(Duration::from_millis(300));
    player.tick();

    assert_eq!(player.search().results().len(), 1);
    assert_eq!(player.search().results()[0].title, "Song1");
    assert!(player.search().is_visible());

    player.dispatch(Command::Promote { result_index: 0 });
    complete_load(&mut player, &log);

    assert_eq!(player.session().current_index(), Some(0));
    assert!(player.session().state().is_playing());
    assert!(!player.search().is_visible());
    assert_eq!(player.search().query(), "");
}

#[test]
fn test_promote_emits_hide_signal() {
    let (mut player, _log, clock) = player_over(two_track_catalog());

    player.dispatch(Command::SetQuery {
        text: "song".to_string(),
    });
    clock.advance(Duration::from_millis(300));
    player.tick();
    player.drain_events();

    player.dispatch(Command::Promote { result_index: 0 });
    let events = player.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::SearchResultsChanged { visible: false, .. }
    )));
}

#[test]
fn test_promote_out_of_range_is_ignored() {
    let (mut player, log, _clock) = player_over(two_track_catalog());

    player.dispatch(Command::Promote { result_index: 3 });
    assert_eq!(player.session().state(), TransportState::Idle);
    assert!(log.lock().unwrap().loads.is_empty());
}

#[test]
fn test_promoting_a_foreign_track_appends_to_the_queue() {
    // A result drawn from a broader superset than the session's catalog:
    // resolution by src fails, so the track is appended and played from
    // the new last index.
    let (sink, log) = MockSink::new();
    let mut session = aria_playback::PlaybackSession::new(
        two_track_catalog().tracks().to_vec(),
        Box::new(sink),
        &SessionConfig::default(),
    );

    let foreign = Track::new("Elsewhere", "Other Artist", "media/elsewhere.mp3");
    assert!(!session.queue().iter().any(|t| t.src == foreign.src));

    let index = session.enqueue(foreign.clone());
    assert_eq!(index, 2, "appended at the old queue size");
    assert_eq!(session.queue_len(), 3);

    session.load_and_play(index).unwrap();
    let generation = log.lock().unwrap().loads.last().unwrap().1;
    session.handle_sink_event(SinkEvent::Loaded {
        generation,
        duration: Duration::from_secs(180),
    });

    assert_eq!(session.current_index(), Some(2));
    assert_eq!(session.current_track(), Some(&foreign));
    assert!(session.state().is_playing());
}

#[test]
fn test_debounce_collapses_rapid_queries() {
    let (mut player, _log, clock) = player_over(two_track_catalog());

    player.dispatch(Command::SetQuery { text: "s".to_string() });
    clock.advance(Duration::from_millis(200));
    player.tick();
    player.dispatch(Command::SetQuery { text: "song2".to_string() });
    clock.advance(Duration::from_millis(200));
    player.tick();

    // Only the second query's deadline may fire
    let events = player.drain_events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, SessionEvent::SearchResultsChanged { .. })));

    clock.advance(Duration::from_millis(100));
    player.tick();
    assert_eq!(player.search().results().len(), 1);
    assert_eq!(player.search().results()[0].title, "Song2");
}

#[test]
fn test_empty_query_always_hides_regardless_of_prior_state() {
    let (mut player, _log, clock) = player_over(two_track_catalog());

    player.dispatch(Command::SetQuery {
        text: "song".to_string(),
    });
    clock.advance(Duration::from_millis(300));
    player.tick();
    assert!(player.search().is_visible());

    player.dispatch(Command::SetQuery { text: String::new() });
    clock.advance(Duration::from_millis(300));
    player.tick();
    assert!(player.search().results().is_empty());
    assert!(!player.search().is_visible());
}

// ===== Event Stream =====

#[test]
fn test_drained_events_cover_the_load_lifecycle() {
    let (mut player, log, _clock) = player_over(two_track_catalog());

    player.dispatch(Command::LoadTrack { index: 0 });
    complete_load(&mut player, &log);

    let events = player.drain_events();
    assert!(matches!(
        events[0],
        SessionEvent::PlaybackStateChanged {
            state: TransportState::Loading { index: 0 }
        }
    ));
    assert!(events.iter().any(|e| matches!(
        e,
        SessionEvent::TrackLoaded { index: 0, duration, .. }
            if *duration == Duration::from_secs(180)
    )));

    // Draining twice yields nothing new
    assert!(player.drain_events().is_empty());
}

#[test]
fn test_progress_updates_flow_through() {
    let (mut player, log, _clock) = player_over(two_track_catalog());

    player.dispatch(Command::LoadTrack { index: 0 });
    complete_load(&mut player, &log);
    player.drain_events();

    let generation = last_generation(&log);
    player.handle_sink_event(SinkEvent::Progress {
        generation,
        position: Duration::from_secs(42),
    });

    assert_eq!(player.session().position(), Duration::from_secs(42));
    let events = player.drain_events();
    assert_eq!(
        events,
        vec![SessionEvent::ProgressUpdated {
            position: Duration::from_secs(42),
            duration: Duration::from_secs(180),
        }]
    );
}
