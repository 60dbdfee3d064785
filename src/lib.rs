//! Rolodex - Interactive user directory search
//!
//! A search-as-you-type front end for a remote user directory: keystrokes
//! are debounced, the settled value is looked up over HTTP, and matches
//! (name plus photo thumbnail) are rendered in a dropdown that follows the
//! input's focus.
//!
//! # Features
//!
//! - **Debounced lookup**: rapid typing collapses into one request for the
//!   last value typed in a quiet period (default window 400 ms)
//! - **Stale-response protection**: every query carries a monotonically
//!   increasing id; only the latest issued query may update the results
//! - **Focus-driven dropdown**: the result list shows while the input has
//!   focus and hides on blur, independent of in-flight fetches
//! - **Graceful degradation**: transport and decode failures become an
//!   empty result list, never a crash
//!
//! # Example
//!
//! ```no_run
//! use rolodex::{AppConfig, HttpDirectory, SearchWidget, UserSource};
//! use std::time::{Duration, Instant};
//!
//! fn main() -> rolodex::Result<()> {
//!     let config = AppConfig::default();
//!     let directory = HttpDirectory::from_config(&config)?;
//!
//!     // Headless use of the widget: type, wait out the debounce, fetch.
//!     let mut widget = SearchWidget::new(config.debounce);
//!     let now = Instant::now();
//!     widget.input("Leanne", now);
//!
//!     if let Some(query) = widget.tick(now + config.debounce) {
//!         let users = directory.search(&query.text)?;
//!         for user in &users {
//!             println!("{} ({})", user.name, user.username);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod directory;
pub mod error;
pub mod logging;
pub mod model;
pub mod search;
pub mod tui;

// Re-export main types
pub use directory::{parse_users, HttpDirectory, UserSource};
pub use error::{Result, RolodexError};
pub use model::{Address, Company, Geo, Photo, User};
pub use search::{spawn_worker, DebounceTimer, SearchQuery, SearchResults, SearchWidget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the directory endpoint
    pub endpoint: String,
    /// Quiet period a keystroke must survive before its lookup runs
    pub debounce: std::time::Duration,
    /// HTTP request timeout
    pub request_timeout: std::time::Duration,
    /// Maximum results kept per lookup
    pub max_results: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://jsonplaceholder.typicode.com".to_string(),
            debounce: std::time::Duration::from_millis(400),
            request_timeout: std::time::Duration::from_secs(10),
            max_results: 50,
        }
    }
}
