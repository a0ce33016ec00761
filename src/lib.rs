//! # Photo Sorter
//!
//! Copies photos and videos from one or more source folders into a library
//! organised as `<category>/<year>/<month>/`, skipping anything whose bytes
//! are already in the library.
//!
//! ## How a run works
//! 1. The existing library is fingerprinted so its content counts as "seen"
//! 2. Every source folder is walked; each media file is fingerprinted, dated
//!    and, if its fingerprint is new, copied into place
//! 3. Byte-identical files are reported as duplicates of the first copy seen
//!
//! ## Architecture
//! - `core` - Fingerprinting, date resolution, the duplicate registry and the
//!   run driver
//! - `events` - Progress events for the CLI (or any other front end)
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at the crate root
pub use error::{Result, SorterError};

/// Initialize tracing for the library
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `warn`.
/// Logs go to stderr so JSON reports on stdout stay clean.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
