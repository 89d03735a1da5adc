//! Output generation for the poller.
//!
//! # Submodules
//!
//! - [`snapshot`]: Writes and reads the JSON snapshot of one refresh cycle
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── news-cache.json   # replaced wholesale every cycle
//! ```

pub mod snapshot;
