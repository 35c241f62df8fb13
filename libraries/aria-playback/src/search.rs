//! Search overlay with debounced recomputation
//!
//! Derives a filtered view of the catalog from a query string. A single
//! pending deadline debounces recomputation: a newer query replaces an
//! older pending one. The overlay owns only its result set and never
//! mutates the catalog.

use crate::clock::Clock;
use crate::events::SessionEvent;
use aria_core::{Catalog, Track};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Debounced search over the catalog
pub struct SearchOverlay {
    clock: Arc<dyn Clock>,
    debounce: Duration,

    query: String,
    deadline: Option<Instant>,
    results: Vec<Track>,
    visible: bool,

    pending_events: Vec<SessionEvent>,
}

impl SearchOverlay {
    /// Create an overlay recomputing `debounce` after the last keystroke
    pub fn new(debounce: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            debounce,
            query: String::new(),
            deadline: None,
            results: Vec::new(),
            visible: false,
            pending_events: Vec::new(),
        }
    }

    /// Store the raw query text and (re)arm the debounce deadline
    ///
    /// A later call cancels an earlier pending recomputation.
    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        self.deadline = Some(self.clock.now() + self.debounce);
    }

    /// Drive the debounce timer; recomputes once the deadline has passed
    pub fn poll(&mut self, catalog: &Catalog) {
        let due = self.deadline.is_some_and(|d| self.clock.now() >= d);
        if due {
            self.deadline = None;
            self.recompute(catalog);
        }
    }

    /// Recompute the result set immediately
    ///
    /// An empty or whitespace-only query clears the results and hides the
    /// overlay; anything else matches case-insensitively by substring
    /// against title and artist, preserving catalog order.
    pub fn recompute(&mut self, catalog: &Catalog) {
        let needle = self.query.trim().to_lowercase();

        if needle.is_empty() {
            self.results.clear();
            self.visible = false;
        } else {
            self.results = catalog
                .filter(|track| {
                    track.title.to_lowercase().contains(&needle)
                        || track.artist.to_lowercase().contains(&needle)
                })
                .into_iter()
                .map(|(_, track)| track.clone())
                .collect();
            self.visible = true;
        }

        self.emit_results_changed();
    }

    /// Reset the overlay after a promotion: clear the query, drop the
    /// results, and signal hide
    pub fn clear(&mut self) {
        self.query.clear();
        self.deadline = None;
        self.results.clear();
        self.visible = false;
        self.emit_results_changed();
    }

    /// Current raw query text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current result set in catalog order
    pub fn results(&self) -> &[Track] {
        &self.results
    }

    /// Result at `index`, if in range
    pub fn result(&self, index: usize) -> Option<&Track> {
        self.results.get(index)
    }

    /// Whether the overlay should be shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Drain all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit_results_changed(&mut self) {
        self.pending_events.push(SessionEvent::SearchResultsChanged {
            results: self.results.clone(),
            visible: self.visible,
        });
    }
}
