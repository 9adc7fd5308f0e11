//! # folio-core — Foundational Types for the Folio Reader Stack
//!
//! Leaf crate of the workspace. Defines the data model shared by the
//! reader state machine, the HTTP client and the access services:
//!
//! - **Packs** (`pack.rs`): `ContentPack` with its ordered `ContentAsset`
//!   sequence. Assets are addressed by position only.
//! - **Access requests** (`request.rs`): the server-owned `AccessRequest`
//!   record and the `AccessSnapshot` tuple held per pack.
//! - **Lock predicate** (`lock.rs`): `can_consume`, the single source of
//!   truth for whether an asset position is locked, and the views derived
//!   from it.
//! - **Authentication** (`auth.rs`): an explicit `AuthContext` value passed
//!   into every collaborator call.
//! - **Errors** (`error.rs`): the `AccessError` taxonomy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `folio-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod auth;
pub mod error;
pub mod identity;
pub mod lock;
pub mod pack;
pub mod request;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use auth::AuthContext;
pub use error::{AccessError, FolioError};
pub use identity::{PackId, PackSlug, RequestId};
pub use lock::{can_consume, slots, AssetSlot, UnlockedView, PREVIEW_COUNT};
pub use pack::{ContentAsset, ContentPack, PackStatus, Price};
pub use request::{AccessRequest, AccessSnapshot, EnrollmentReceipt, RequestStatus};
pub use temporal::Timestamp;
