//! Main application state and event loop

use crate::directory::HttpDirectory;
use crate::error::{Result, RolodexError};
use crate::search::{spawn_worker, SearchQuery, SearchResults, SearchWidget};
use crate::tui::ui;
use crate::AppConfig;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::{Duration, Instant};

pub struct App {
    // The headless search widget: text, debounce slot, results, open flag
    pub widget: SearchWidget,
    /// Byte offset of the cursor within the input text
    pub cursor_pos: usize,
    /// Dropdown selection + scroll
    pub list_state: ListState,
    pub status_message: String,
    pub last_duration: Option<Duration>,
    pub should_quit: bool,

    // Fetches dispatched but not yet answered
    in_flight: usize,

    // Channels to the fetch worker
    query_tx: Sender<SearchQuery>,
    result_rx: Receiver<SearchResults>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let directory = HttpDirectory::from_config(config)?;

        let (query_tx, query_rx) = channel::<SearchQuery>();
        let (result_tx, result_rx) = channel::<SearchResults>();
        spawn_worker(Box::new(directory), query_rx, result_tx);

        Ok(Self {
            widget: SearchWidget::new(config.debounce),
            cursor_pos: 0,
            list_state: ListState::default(),
            status_message: "Type to search the directory".to_string(),
            last_duration: None,
            should_quit: false,
            in_flight: 0,
            query_tx,
            result_rx,
        })
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        RolodexError: From<B::Error>,
    {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    self.handle_key(key);
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.poll_results();
                self.dispatch_due_query();
                last_tick = Instant::now();
            }

            if self.should_quit {
                // No debounce callback may outlive the session.
                self.widget.cancel_pending();
                return Ok(());
            }
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight > 0
    }

    /// Send the settled query to the worker once the debounce window elapses.
    fn dispatch_due_query(&mut self) {
        if let Some(query) = self.widget.tick(Instant::now()) {
            log::debug!("dispatching query {} for '{}'", query.id, query.text);
            if self.query_tx.send(query).is_ok() {
                self.in_flight += 1;
            } else {
                self.status_message = "Search worker is gone".to_string();
            }
        }
    }

    /// Pump worker results into the widget (non-blocking).
    fn poll_results(&mut self) {
        while let Ok(results) = self.result_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.last_duration = Some(results.duration);

            if !self.widget.apply(results) {
                continue;
            }

            let count = self.widget.users().len();
            self.list_state
                .select(if count == 0 { None } else { Some(0) });
            self.status_message = match count {
                0 if self.widget.value().trim().is_empty() => {
                    "Type to search the directory".to_string()
                }
                0 => format!("No matches for '{}'", self.widget.value()),
                1 => "1 match".to_string(),
                n => format!("{} matches", n),
            };
        }
    }

    /// Replace the input text through the widget so the synchronous emit and
    /// the debounce restart both happen.
    fn replace_input(&mut self, value: String) {
        let emitted = self.widget.input(value, Instant::now());
        log::trace!("input changed: '{}'", emitted);
    }

    fn select_prev(&mut self) {
        let current = self.list_state.selected().unwrap_or(0);
        if !self.widget.users().is_empty() && current > 0 {
            self.list_state.select(Some(current - 1));
        }
    }

    fn select_next(&mut self) {
        let current = self.list_state.selected().unwrap_or(0);
        if !self.widget.users().is_empty() && current < self.widget.users().len() - 1 {
            self.list_state.select(Some(current + 1));
        }
    }

    /// Put the selected entry's details in the status bar.
    fn announce_selected(&mut self) {
        if let Some(user) = self
            .list_state
            .selected()
            .and_then(|i| self.widget.users().get(i))
        {
            self.status_message = match user.contact() {
                Some(contact) => format!("{} <{}>", user.name, contact),
                None => user.name.clone(),
            };
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.widget.is_focused() && !self.widget.value().is_empty() {
                    self.cursor_pos = 0;
                    self.replace_input(String::new());
                } else if self.widget.is_focused() {
                    self.widget.blur();
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.widget.is_focused() {
            self.handle_search_key(key);
        } else {
            self.handle_blurred_key(key);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut value = self.widget.value().to_string();
                value.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
                self.replace_input(value);
            }
            KeyCode::Backspace => {
                if self.cursor_pos > 0 {
                    // Find the previous character boundary
                    let prev = self.widget.value()[..self.cursor_pos]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    let mut value = self.widget.value().to_string();
                    value.remove(prev);
                    self.cursor_pos = prev;
                    self.replace_input(value);
                }
            }
            KeyCode::Delete => {
                if self.cursor_pos < self.widget.value().len() {
                    let mut value = self.widget.value().to_string();
                    value.remove(self.cursor_pos);
                    self.replace_input(value);
                }
            }
            KeyCode::Left => {
                if self.cursor_pos > 0 {
                    let prev = self.widget.value()[..self.cursor_pos]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.cursor_pos = prev;
                }
            }
            KeyCode::Right => {
                if self.cursor_pos < self.widget.value().len() {
                    let next = self.widget.value()[self.cursor_pos..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor_pos + i)
                        .unwrap_or(self.widget.value().len());
                    self.cursor_pos = next;
                }
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
            }
            KeyCode::End => {
                self.cursor_pos = self.widget.value().len();
            }
            KeyCode::Up => self.select_prev(),
            KeyCode::Down => self.select_next(),
            KeyCode::Enter => self.announce_selected(),
            KeyCode::Tab => {
                self.widget.blur();
            }
            _ => {}
        }
    }

    fn handle_blurred_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Char('/') => {
                self.widget.focus();
            }

            // Any other printable char refocuses the input and types
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.widget.focus();
                let mut value = self.widget.value().to_string();
                value.push(c);
                self.cursor_pos = value.len();
                self.replace_input(value);
            }

            _ => {}
        }
    }
}
