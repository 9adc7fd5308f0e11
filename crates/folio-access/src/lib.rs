//! # folio-access — Access Resolution and the Pack Page Facade
//!
//! Services that own the per-pack `{grant, request}` state:
//!
//! - **Cell** (`cell.rs`): the shared tuple, replaced whole, with teardown
//!   discard.
//! - **Resolver** (`resolver.rs`): pulls grant state. Never fails toward the
//!   caller; degrades to the anonymous default.
//! - **Requester** (`requester.rs`): submits access requests. All or
//!   nothing, one attempt.
//! - **Notices** (`notice.rs`, `notifier.rs`): request banners and the
//!   injected user-message sink.
//! - **Facade** (`facade.rs`): `PackAccess`, which binds a loaded pack, the
//!   access state, the reader and the preview overlay together.
//!
//! Credentials are passed explicitly as [`folio_core::AuthContext`] values;
//! nothing here reads ambient session state.

pub mod cell;
pub mod facade;
pub mod notice;
pub mod notifier;
pub mod requester;
pub mod resolver;

pub use cell::{AccessCell, Applied};
pub use facade::{EnrollOutcome, IndexOption, LoadOutcome, PackAccess};
pub use notice::{StatusNotice, Tone};
pub use notifier::{
    Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier, NOTICE_TARGET,
};
pub use requester::EnrollmentRequester;
pub use resolver::{AccessResolver, StatusOutcome};
