//! # folio-cli — Folio Command-Line Interface
//!
//! Composition root for the reader stack: wires the HTTP backend, a console
//! notifier and the credential from the command line into a `PackAccess`.
//!
//! ## Subcommands
//!
//! - `show` — pack details with the lock state of every document
//! - `status` — the user's grant and request on a pack
//! - `request` — submit an access request
//! - `read` — open the reader and walk the unlocked documents
//!
//! Handlers return the process exit code; business logic stays in
//! `folio-access`.

pub mod console;
pub mod read;
pub mod request;
pub mod session;
pub mod show;
pub mod status;
