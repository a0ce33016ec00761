//! # photo-sort CLI
//!
//! Command-line interface for the photo sorter.
//!
//! ## Usage
//! ```bash
//! photo-sort sort -i ~/Camera -i ~/Phone -d ~/Pictures/Library
//! photo-sort sort -i ~/Camera -d ~/Pictures/Library --dry-run --output json
//! ```

mod cli;

use photo_sorter::Result;

fn main() -> Result<()> {
    cli::run()
}
