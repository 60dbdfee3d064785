//! Debounced search core
//!
//! [`SearchWidget`] owns everything the search experience needs: the
//! current input text, the result list, the dropdown-open flag, and a
//! single-slot debounce timer. It is deliberately headless — the TUI
//! drives it with keystrokes and clock readings, and the integration
//! tests drive it the same way without a terminal.
//!
//! Fetches run on a worker thread ([`spawn_worker`]). Each issued query
//! carries a monotonically increasing id; the widget accepts only results
//! for the id it issued last, so a slow response can never overwrite a
//! newer one.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::directory::UserSource;
use crate::model::User;

/// Query sent to the worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub id: u64,
    pub text: String,
}

/// Results from the worker thread
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub query_id: u64,
    pub users: Vec<User>,
    pub duration: Duration,
}

/// Single-slot cancellable delay.
///
/// Arming replaces any previously armed deadline, so a superseded timer can
/// never fire. There is exactly one slot, never a collection of timers.
#[derive(Debug, Default)]
pub struct DebounceTimer {
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// Arm (or re-arm) the slot to fire `window` after `now`.
    pub fn arm(&mut self, now: Instant, window: Duration) {
        self.deadline = Some(now + window);
    }

    /// Disarm the slot.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the armed deadline has elapsed; the slot
    /// disarms itself on firing.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Search widget state: input text, results, dropdown visibility, and the
/// pending debounce slot.
pub struct SearchWidget {
    value: String,
    users: Vec<User>,
    open: bool,
    focused: bool,
    timer: DebounceTimer,
    debounce: Duration,
    /// Id of the most recently issued query. Results for older ids are stale.
    query_counter: u64,
}

impl SearchWidget {
    pub fn new(debounce: Duration) -> Self {
        Self {
            value: String::new(),
            users: Vec::new(),
            open: false,
            focused: true,
            timer: DebounceTimer::default(),
            debounce,
            query_counter: 0,
        }
    }

    /// Currently displayed text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current result list, in endpoint order.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Whether the dropdown is visible.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether a debounce window is currently running.
    pub fn has_pending(&self) -> bool {
        self.timer.is_armed()
    }

    /// Externally controlled `value`: replaces the displayed text without
    /// scheduling a lookup.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Keystroke path: replaces the text, restarts the debounce window, and
    /// returns the emitted value synchronously (the emit is never debounced).
    pub fn input(&mut self, value: impl Into<String>, now: Instant) -> &str {
        self.value = value.into();
        self.timer.arm(now, self.debounce);
        &self.value
    }

    /// Advance the widget clock. Yields at most one query: the one for the
    /// last value typed before the window elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<SearchQuery> {
        if !self.timer.fire(now) {
            return None;
        }
        self.query_counter += 1;
        Some(SearchQuery {
            id: self.query_counter,
            text: self.value.clone(),
        })
    }

    /// Apply results from the worker. Results for a superseded query id are
    /// discarded; returns whether the list was replaced.
    pub fn apply(&mut self, results: SearchResults) -> bool {
        if results.query_id != self.query_counter {
            log::debug!(
                "discarding stale results for query {} (latest is {})",
                results.query_id,
                self.query_counter
            );
            return false;
        }
        self.users = results.users;
        self.open = self.focused && !self.users.is_empty();
        true
    }

    /// Input gained focus: show the dropdown if there is anything to show.
    pub fn focus(&mut self) {
        self.focused = true;
        self.open = !self.users.is_empty();
    }

    /// Input lost focus: dismiss the dropdown, independent of in-flight
    /// fetches.
    pub fn blur(&mut self) {
        self.focused = false;
        self.open = false;
    }

    /// Teardown: disarm the debounce slot so nothing fires against a dead
    /// widget.
    pub fn cancel_pending(&mut self) {
        self.timer.cancel();
    }
}

/// Spawn the fetch worker thread.
///
/// The worker owns the directory source, executes one lookup per received
/// query, and degrades failures to an empty result list. It exits when the
/// query channel disconnects.
pub fn spawn_worker(
    source: Box<dyn UserSource>,
    query_rx: Receiver<SearchQuery>,
    result_tx: Sender<SearchResults>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(query) = query_rx.recv() {
            let start = Instant::now();
            let users = match source.search(&query.text) {
                Ok(users) => users,
                Err(e) => {
                    log::warn!("lookup for '{}' degraded to no results: {e}", query.text);
                    Vec::new()
                }
            };
            let results = SearchResults {
                query_id: query.id,
                users,
                duration: start.elapsed(),
            };
            if result_tx.send(results).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, RolodexError};
    use std::sync::mpsc;

    const WINDOW: Duration = Duration::from_millis(400);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn user(id: u64, name: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "username": name.replace(' ', "."),
        }))
        .unwrap()
    }

    fn results(query_id: u64, users: Vec<User>) -> SearchResults {
        SearchResults {
            query_id,
            users,
            duration: Duration::ZERO,
        }
    }

    struct ScriptedSource(Vec<User>);

    impl UserSource for ScriptedSource {
        fn search(&self, _query: &str) -> Result<Vec<User>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl UserSource for FailingSource {
        fn search(&self, query: &str) -> Result<Vec<User>> {
            Err(RolodexError::Status {
                status: 503,
                query: query.to_string(),
            })
        }
    }

    #[test]
    fn timer_fires_once_after_deadline() {
        let t0 = Instant::now();
        let mut timer = DebounceTimer::default();
        timer.arm(t0, WINDOW);

        assert!(!timer.fire(t0 + ms(399)));
        assert!(timer.fire(t0 + ms(400)));
        assert!(!timer.fire(t0 + ms(401)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn rearming_replaces_the_deadline() {
        let t0 = Instant::now();
        let mut timer = DebounceTimer::default();
        timer.arm(t0, WINDOW);
        timer.arm(t0 + ms(300), WINDOW);

        // The superseded deadline (t0+400) must not fire.
        assert!(!timer.fire(t0 + ms(400)));
        assert!(timer.fire(t0 + ms(700)));
    }

    #[test]
    fn cancel_disarms() {
        let t0 = Instant::now();
        let mut timer = DebounceTimer::default();
        timer.arm(t0, WINDOW);
        timer.cancel();
        assert!(!timer.fire(t0 + ms(1000)));
    }

    #[test]
    fn input_emits_every_keystroke_synchronously() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);

        assert_eq!(widget.input("L", t0), "L");
        assert_eq!(widget.input("Le", t0 + ms(50)), "Le");
        assert_eq!(widget.input("Lea", t0 + ms(100)), "Lea");
        assert_eq!(widget.value(), "Lea");
    }

    #[test]
    fn rapid_keystrokes_collapse_to_one_query_with_final_value() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);

        widget.input("L", t0);
        widget.input("Lean", t0 + ms(150));
        widget.input("Leanne", t0 + ms(300));

        // Quiet period has not elapsed since the last keystroke.
        assert_eq!(widget.tick(t0 + ms(400)), None);
        assert_eq!(widget.tick(t0 + ms(650)), None);

        let query = widget.tick(t0 + ms(700)).unwrap();
        assert_eq!(query.text, "Leanne");
        assert_eq!(query.id, 1);

        // Exactly one query per settled value.
        assert_eq!(widget.tick(t0 + ms(2000)), None);
    }

    #[test]
    fn set_value_renders_without_scheduling() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);

        widget.set_value("Leanne Graham");
        assert_eq!(widget.value(), "Leanne Graham");
        assert!(!widget.has_pending());
        assert_eq!(widget.tick(t0 + ms(10_000)), None);
    }

    #[test]
    fn successful_fetch_opens_dropdown_while_focused() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);
        widget.input("gra", t0);
        let query = widget.tick(t0 + ms(400)).unwrap();

        assert!(widget.apply(results(query.id, vec![user(1, "Leanne Graham")])));
        assert!(widget.is_open());
        assert_eq!(widget.users().len(), 1);
    }

    #[test]
    fn results_do_not_open_dropdown_while_blurred() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);
        widget.input("gra", t0);
        let query = widget.tick(t0 + ms(400)).unwrap();

        widget.blur();
        assert!(widget.apply(results(query.id, vec![user(1, "Leanne Graham")])));
        assert!(!widget.is_open());

        // Focus reveals the list that arrived while blurred.
        widget.focus();
        assert!(widget.is_open());
    }

    #[test]
    fn blur_dismisses_regardless_of_contents() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);
        widget.input("gra", t0);
        let query = widget.tick(t0 + ms(400)).unwrap();
        widget.apply(results(query.id, vec![user(1, "Leanne Graham")]));

        widget.blur();
        assert!(!widget.is_open());
        assert_eq!(widget.users().len(), 1);
    }

    #[test]
    fn focus_with_no_results_keeps_dropdown_closed() {
        let mut widget = SearchWidget::new(WINDOW);
        widget.focus();
        assert!(!widget.is_open());
    }

    #[test]
    fn empty_result_set_closes_dropdown() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);
        widget.input("gra", t0);
        let query = widget.tick(t0 + ms(400)).unwrap();
        widget.apply(results(query.id, vec![user(1, "Leanne Graham")]));
        assert!(widget.is_open());

        widget.input("zzz", t0 + ms(500));
        let query = widget.tick(t0 + ms(900)).unwrap();
        widget.apply(results(query.id, Vec::new()));
        assert!(!widget.is_open());
        assert!(widget.users().is_empty());
    }

    #[test]
    fn stale_results_are_discarded() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);

        widget.input("first", t0);
        let first = widget.tick(t0 + ms(400)).unwrap();
        widget.input("second", t0 + ms(500));
        let second = widget.tick(t0 + ms(900)).unwrap();

        // The fast response for the newer query lands first.
        assert!(widget.apply(results(second.id, vec![user(2, "Ervin Howell")])));
        // The slow response for the superseded query must not win.
        assert!(!widget.apply(results(first.id, vec![user(1, "Leanne Graham")])));
        assert_eq!(widget.users()[0].name, "Ervin Howell");
    }

    #[test]
    fn teardown_cancels_the_pending_window() {
        let t0 = Instant::now();
        let mut widget = SearchWidget::new(WINDOW);
        widget.input("gra", t0);
        assert!(widget.has_pending());

        widget.cancel_pending();
        assert!(!widget.has_pending());
        assert_eq!(widget.tick(t0 + ms(10_000)), None);
    }

    #[test]
    fn worker_reports_results_with_matching_id() {
        let (query_tx, query_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_worker(
            Box::new(ScriptedSource(vec![user(1, "Leanne Graham")])),
            query_rx,
            result_tx,
        );

        query_tx
            .send(SearchQuery {
                id: 42,
                text: "Leanne".to_string(),
            })
            .unwrap();

        let results = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(results.query_id, 42);
        assert_eq!(results.users.len(), 1);

        drop(query_tx);
        handle.join().unwrap();
    }

    #[test]
    fn worker_degrades_failures_to_empty_results() {
        let (query_tx, query_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(FailingSource), query_rx, result_tx);

        query_tx
            .send(SearchQuery {
                id: 1,
                text: "Leanne".to_string(),
            })
            .unwrap();

        let results = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(results.query_id, 1);
        assert!(results.users.is_empty());

        drop(query_tx);
        handle.join().unwrap();
    }
}
