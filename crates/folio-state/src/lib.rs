//! # folio-state — Reader State Machines
//!
//! Synchronous, I/O-free state for consuming a pack's documents.
//!
//! - **Reader** (`reader.rs`): `Closed → Open(mode, index)` over the
//!   unlocked prefix of a pack. Two modes: single-asset navigation and
//!   continuous scroll (grant only). The index can only ever address an
//!   unlocked asset.
//!
//! - **Preview overlay** (`overlay.rs`): full-view display of one asset.
//!   Callers check the lock predicate before opening it.
//!
//! Refused transitions return an error and leave state untouched. They are
//! warnings for the caller to relay, never panics.

pub mod overlay;
pub mod reader;

pub use overlay::PreviewOverlay;
pub use reader::{Reader, ReaderBounds, ReaderError, ReaderMode, ReaderState};
