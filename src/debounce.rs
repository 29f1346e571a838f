//! Client-Side Debouncer (C12, §4.12): a transport-agnostic state machine
//! that a browser-side (wasm) front end would drive on every keystroke.
//!
//! The DOM event listener and the actual `fetch()`/`EventSource` calls are
//! external (§1 Non-goals); this module owns only the debounce timing,
//! cancellation-on-query-change, and tier-1/tier-2 result merge, so it is
//! unit-testable under `tokio::time::pause()` without a browser.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::models::Item;

/// Autocomplete (tier-1) fires 300ms after the last keystroke.
pub const TIER1_DELAY: Duration = Duration::from_millis(300);
/// Search (tier-2) fires 750ms after the last keystroke, or immediately on Enter.
pub const TIER2_DELAY: Duration = Duration::from_millis(750);

/// The side effects a [`Debouncer`] drives. A real front end implements this
/// over `fetch()`/`EventSource`; tests implement it over a recording `Vec`.
pub trait RequestSink: Send + Sync {
    fn send_autocomplete(&self, query: &str);
    fn send_search(&self, query: &str);
    /// Abort any in-flight autocomplete/search request or stream.
    fn cancel_all(&self);
}

/// Two cooperative debounce timers plus a merge accumulator, keyed by
/// source tag (§3's `movie`/`tv`/.../`album` arrays).
pub struct Debouncer<R: RequestSink + 'static> {
    sink: Arc<R>,
    current_query: Arc<Mutex<String>>,
    accumulator: Arc<Mutex<HashMap<String, Vec<Item>>>>,
    tier1: Option<JoinHandle<()>>,
    tier2: Option<JoinHandle<()>>,
}

impl<R: RequestSink + 'static> Debouncer<R> {
    #[must_use]
    pub fn new(sink: Arc<R>) -> Self {
        Self {
            sink,
            current_query: Arc::new(Mutex::new(String::new())),
            accumulator: Arc::new(Mutex::new(HashMap::new())),
            tier1: None,
            tier2: None,
        }
    }

    /// Current debounced query text, for assembling a merged response view.
    #[must_use]
    pub fn current_query(&self) -> String {
        self.current_query.lock().unwrap().clone()
    }

    /// Snapshot of the merged tier-1/tier-2 accumulator.
    #[must_use]
    pub fn accumulated(&self) -> HashMap<String, Vec<Item>> {
        self.accumulator.lock().unwrap().clone()
    }

    /// Drive a keystroke. Restarts both timers; if the text actually changed
    /// from the previous keystroke, cancels in-flight requests/streams and
    /// clears the accumulator (§4.12).
    pub fn on_keystroke(&mut self, query: impl Into<String>) {
        let query = query.into();
        let changed = {
            let mut current = self.current_query.lock().unwrap();
            let changed = *current != query;
            *current = query.clone();
            changed
        };
        if changed {
            self.sink.cancel_all();
            self.accumulator.lock().unwrap().clear();
        }

        if let Some(handle) = self.tier1.take() {
            handle.abort();
        }
        if let Some(handle) = self.tier2.take() {
            handle.abort();
        }
        self.tier1 = Some(self.spawn_timer(TIER1_DELAY, query.clone(), Tier::Autocomplete));
        self.tier2 = Some(self.spawn_timer(TIER2_DELAY, query, Tier::Search));
    }

    /// Enter key: fire tier-2 (search) immediately instead of waiting out
    /// its 750ms window. Tier-1 is left running.
    pub fn on_enter(&mut self) {
        if let Some(handle) = self.tier2.take() {
            handle.abort();
        }
        let query = self.current_query();
        self.sink.send_search(&query);
    }

    fn spawn_timer(&self, delay: Duration, query: String, tier: Tier) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match tier {
                Tier::Autocomplete => sink.send_autocomplete(&query),
                Tier::Search => sink.send_search(&query),
            }
        })
    }

    /// Merge a tier-1 (autocomplete) response into the accumulator, unless
    /// it's stale (`query` no longer matches the current debounced text).
    /// Tier-1 never overwrites a key tier-2 has already filled.
    pub fn on_autocomplete_response(&self, query: &str, results: HashMap<String, Vec<Item>>) {
        if *self.current_query.lock().unwrap() != query {
            return;
        }
        let mut accumulator = self.accumulator.lock().unwrap();
        for (source, items) in results {
            accumulator.entry(source).or_insert(items);
        }
    }

    /// Merge a tier-2 (search) response into the accumulator, unless it's
    /// stale. Tier-2 overwrites tier-1 for every key it touches (§4.12).
    pub fn on_search_response(&self, query: &str, results: HashMap<String, Vec<Item>>) {
        if *self.current_query.lock().unwrap() != query {
            return;
        }
        let mut accumulator = self.accumulator.lock().unwrap();
        for (source, items) in results {
            accumulator.insert(source, items);
        }
    }
}

#[derive(Clone, Copy)]
enum Tier {
    Autocomplete,
    Search,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl RequestSink for RecordingSink {
        fn send_autocomplete(&self, query: &str) {
            self.events.lock().unwrap().push(format!("autocomplete:{query}"));
        }
        fn send_search(&self, query: &str) {
            self.events.lock().unwrap().push(format!("search:{query}"));
        }
        fn cancel_all(&self) {
            self.events.lock().unwrap().push("cancel".to_string());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_fire_once_for_final_query() {
        let sink = Arc::new(RecordingSink::default());
        let mut debouncer = Debouncer::new(Arc::clone(&sink));

        debouncer.on_keystroke("a");
        tokio::time::advance(Duration::from_millis(50)).await;
        debouncer.on_keystroke("ab");
        tokio::time::advance(Duration::from_millis(50)).await;
        debouncer.on_keystroke("abc");
        tokio::time::advance(Duration::from_millis(800)).await;
        tokio::task::yield_now().await;

        let events = sink.events.lock().unwrap().clone();
        let autocomplete_count = events.iter().filter(|e| e.starts_with("autocomplete:")).count();
        let search_count = events.iter().filter(|e| e.starts_with("search:")).count();
        assert_eq!(autocomplete_count, 1, "expected exactly one autocomplete fire, got {events:?}");
        assert_eq!(search_count, 1, "expected exactly one search fire, got {events:?}");
        assert!(events.contains(&"autocomplete:abc".to_string()));
        assert!(events.contains(&"search:abc".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn query_change_cancels_in_flight_and_clears_accumulator() {
        let sink = Arc::new(RecordingSink::default());
        let mut debouncer = Debouncer::new(Arc::clone(&sink));

        debouncer.on_keystroke("dune");
        let mut results = HashMap::new();
        results.insert("movie".to_string(), vec![Item::default()]);
        debouncer.on_autocomplete_response("dune", results);
        assert!(!debouncer.accumulated().is_empty());

        debouncer.on_keystroke("dune ");
        assert!(debouncer.accumulated().is_empty());
        assert!(sink.events.lock().unwrap().contains(&"cancel".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded() {
        let sink = Arc::new(RecordingSink::default());
        let mut debouncer = Debouncer::new(Arc::clone(&sink));

        debouncer.on_keystroke("dune");
        debouncer.on_keystroke("dune part two");

        let mut results = HashMap::new();
        results.insert("movie".to_string(), vec![Item::default()]);
        debouncer.on_autocomplete_response("dune", results);

        assert!(debouncer.accumulated().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tier_two_overwrites_tier_one_for_shared_keys() {
        let sink = Arc::new(RecordingSink::default());
        let mut debouncer = Debouncer::new(Arc::clone(&sink));
        debouncer.on_keystroke("dune");

        let tier1_item = Item {
            search_title: "Dune (tier1 stub)".to_string(),
            ..Item::default()
        };
        let tier2_item = Item {
            search_title: "Dune".to_string(),
            ..Item::default()
        };

        let mut tier1_results = HashMap::new();
        tier1_results.insert("movie".to_string(), vec![tier1_item]);
        debouncer.on_autocomplete_response("dune", tier1_results);

        let mut tier2_results = HashMap::new();
        tier2_results.insert("movie".to_string(), vec![tier2_item]);
        debouncer.on_search_response("dune", tier2_results);

        let accumulated = debouncer.accumulated();
        assert_eq!(accumulated["movie"][0].search_title, "Dune");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_fires_search_immediately() {
        let sink = Arc::new(RecordingSink::default());
        let mut debouncer = Debouncer::new(Arc::clone(&sink));

        debouncer.on_keystroke("dune");
        debouncer.on_enter();
        tokio::task::yield_now().await;

        let events = sink.events.lock().unwrap().clone();
        assert!(events.contains(&"search:dune".to_string()));
        assert!(events.iter().filter(|e| e.starts_with("search:")).count() == 1);
    }
}
