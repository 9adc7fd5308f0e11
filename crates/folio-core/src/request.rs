//! # Access Requests
//!
//! An `AccessRequest` is a server-owned record of a user asking for a
//! grant on a pack. The client reads and creates requests but never moves
//! them between states itself; approval happens out of band.
//!
//! ```text
//! pending ──▶ approved   (superseded by a permanent grant)
//!    │
//!    ├──────▶ rejected   (user may resubmit)
//!    └──────▶ cancelled  (user may resubmit)
//! ```
//!
//! `AccessSnapshot` is the `{grant, request}` tuple held per pack. It is
//! always replaced as a whole.

use serde::{Deserialize, Serialize};

use crate::identity::RequestId;
use crate::temporal::Timestamp;

/// Lifecycle status of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for an administrator.
    Pending,
    /// Approved; the grant follows.
    Approved,
    /// Refused by an administrator.
    Rejected,
    /// Withdrawn.
    Cancelled,
}

impl RequestStatus {
    /// Whether an administrator still has to act.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the request has reached a final status.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Whether the user may submit a new request after this one.
    pub fn allows_resubmission(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's request for a grant on one pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    #[serde(rename = "_id")]
    pub id: RequestId,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<Timestamp>,
    /// Note left by the administrator, typically on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    /// Contact handle the user supplied with the request.
    #[serde(rename = "whatsappNumber", default, skip_serializing_if = "Option::is_none")]
    pub contact_handle: Option<String>,
}

/// Access state for the current user on one pack.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessSnapshot {
    /// Whether every asset of the pack is unlocked.
    pub grant: bool,
    /// The latest request, if the server reported one.
    pub request: Option<AccessRequest>,
}

impl AccessSnapshot {
    /// The state of an anonymous visitor: no grant, no request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A permanent grant; any request is superseded.
    pub fn granted() -> Self {
        Self {
            grant: true,
            request: None,
        }
    }

    /// No grant yet, with the given request on file.
    pub fn requested(request: AccessRequest) -> Self {
        Self {
            grant: false,
            request: Some(request),
        }
    }

    /// Status of the held request, if any.
    pub fn request_status(&self) -> Option<RequestStatus> {
        self.request.as_ref().map(|r| r.status)
    }

    /// Whether a request is waiting for an administrator.
    pub fn has_pending_request(&self) -> bool {
        self.request_status().is_some_and(|s| s.is_pending())
    }
}

/// Result of submitting an access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentReceipt {
    /// The user already holds a grant; no request was created.
    pub grant: bool,
    /// The created or updated request, when no grant exists.
    pub request: Option<AccessRequest>,
    /// Server-provided confirmation text.
    pub message: Option<String>,
}

impl EnrollmentReceipt {
    /// The snapshot this receipt establishes. A grant clears any request.
    pub fn snapshot(&self) -> AccessSnapshot {
        if self.grant {
            AccessSnapshot::granted()
        } else {
            AccessSnapshot {
                grant: false,
                request: self.request.clone(),
            }
        }
    }
}
