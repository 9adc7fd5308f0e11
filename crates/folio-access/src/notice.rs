//! Banner content describing the held access request.

use serde::Serialize;

use folio_core::{AccessRequest, AccessSnapshot, RequestStatus};

/// Visual tone of a status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusNotice {
    pub tone: Tone,
    pub headline: String,
    pub detail: String,
}

impl StatusNotice {
    /// Banner for `request`. A rejection shows the administrator's note
    /// when one was left.
    pub fn for_request(request: &AccessRequest) -> Self {
        let (tone, headline, detail) = match request.status {
            RequestStatus::Pending => (
                Tone::Warning,
                "Request pending",
                "Your request was sent. An administrator approves it once payment is confirmed."
                    .to_string(),
            ),
            RequestStatus::Approved => (
                Tone::Success,
                "Request approved",
                "Your request was approved. If the documents are still locked, refresh access."
                    .to_string(),
            ),
            RequestStatus::Rejected => (
                Tone::Danger,
                "Request rejected",
                match request.admin_note.as_deref().map(str::trim) {
                    Some(note) if !note.is_empty() => format!("Administrator note: {note}"),
                    _ => "Your request was rejected. Contact the team if needed.".to_string(),
                },
            ),
            RequestStatus::Cancelled => (
                Tone::Info,
                "Request cancelled",
                "Your request was cancelled.".to_string(),
            ),
        };
        Self {
            tone,
            headline: headline.to_string(),
            detail,
        }
    }

    /// Banner for the request held in `snapshot`, if any.
    pub fn for_snapshot(snapshot: &AccessSnapshot) -> Option<Self> {
        snapshot.request.as_ref().map(Self::for_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{RequestId, Timestamp};

    fn request(status: RequestStatus, note: Option<&str>) -> AccessRequest {
        AccessRequest {
            id: RequestId::new("r1").unwrap(),
            status,
            created_at: Timestamp::now(),
            approved_at: None,
            admin_note: note.map(str::to_string),
            contact_handle: None,
        }
    }

    #[test]
    fn rejected_carries_note() {
        let rejected = request(RequestStatus::Rejected, Some("Payment not received"));
        let notice = StatusNotice::for_request(&rejected);
        assert_eq!(notice.tone, Tone::Danger);
        assert_eq!(notice.detail, "Administrator note: Payment not received");
    }

    #[test]
    fn rejected_blank_note_uses_default() {
        let notice = StatusNotice::for_request(&request(RequestStatus::Rejected, Some("  ")));
        assert!(notice.detail.starts_with("Your request was rejected"));
    }

    #[test]
    fn one_tone_per_status() {
        let tones: Vec<Tone> = [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ]
        .into_iter()
        .map(|s| StatusNotice::for_request(&request(s, None)).tone)
        .collect();
        assert_eq!(tones, vec![Tone::Warning, Tone::Success, Tone::Danger, Tone::Info]);
    }

    #[test]
    fn no_request_no_banner() {
        assert_eq!(StatusNotice::for_snapshot(&AccessSnapshot::granted()), None);
    }
}
