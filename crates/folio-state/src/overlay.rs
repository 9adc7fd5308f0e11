//! # Preview Overlay
//!
//! Full-view display of a single asset, independent of the reader's index.
//! The overlay only displays; callers decide whether the asset may be shown
//! (see `folio_core::can_consume`).

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Shown {
    location: String,
    title: String,
}

/// Visibility plus the currently shown location and title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewOverlay {
    shown: Option<Shown>,
}

impl PreviewOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `location` under `title`, replacing anything already shown.
    pub fn open(&mut self, location: impl Into<String>, title: impl Into<String>) {
        self.shown = Some(Shown {
            location: location.into(),
            title: title.into(),
        });
    }

    /// Hide the overlay and forget what was shown.
    pub fn close(&mut self) {
        self.shown = None;
    }

    pub fn is_visible(&self) -> bool {
        self.shown.is_some()
    }

    pub fn location(&self) -> Option<&str> {
        self.shown.as_ref().map(|s| s.location.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.shown.as_ref().map(|s| s.title.as_str())
    }
}
