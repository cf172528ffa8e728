//! Top Items Sync Library
//!
//! Refreshes a listener's API credential, collects their top artists, tracks,
//! genres and emotions for every time range, and forwards the combined record
//! to a queue. One invocation handles one queue event for one user.
//!
//! # Modules
//!
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy of the aggregation pipeline
//! - `event` - Decoding of the incoming queue event
//! - `handler` - One invocation, event in and message out
//! - `management` - Orchestration of the concurrent collection
//! - `queue` - Queue publishing
//! - `spotify` - Data API client: gateway, token refresh, top items
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod management;
pub mod queue;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for the binary boundary.
///
/// Uses a boxed dynamic error trait object with Send + Sync bounds so any of
/// the crate's error types can be bubbled up with `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Published top items for {}", user_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors at the binary boundary; library code returns errors.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
