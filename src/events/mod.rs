//! # Events Module
//!
//! Progress reporting for sort runs.
//!
//! The sorter emits [`Event`]s through a channel; the CLI (or any other front
//! end) drains the receiver on its own thread.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::File(FileEvent::Duplicate { duplicate, original }) = event {
//!             println!("{} duplicates {}", duplicate.display(), original.display());
//!         }
//!     }
//! });
//!
//! sorter.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
