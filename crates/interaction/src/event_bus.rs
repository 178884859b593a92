use foundation::Chamber;
use roster::RosterMember;
use serde::Serialize;
use streaming::BoundaryLoadError;

use crate::pointer::ScreenPoint;

/// Notifications for the embedding application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// An official was committed; the application shows their report.
    Selected { member: RosterMember },
    /// Several officials share the clicked region; the application presents
    /// a choice and answers with `pick` or `dismiss`.
    DisambiguationRequested { candidates: Vec<RosterMember> },
    /// Transient "not found" indicator for a click that resolved to nothing.
    NotFound { position: ScreenPoint },
    BoundariesReady { chamber: Chamber, features: usize },
    /// `chamber` is `None` for the state outline overlay.
    BoundaryLoadFailed {
        chamber: Option<Chamber>,
        message: String,
    },
}

impl SessionEvent {
    pub fn load_failed(chamber: Option<Chamber>, err: &BoundaryLoadError) -> Self {
        SessionEvent::BoundaryLoadFailed {
            chamber,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedEvent {
    /// Position in the session's event stream, starting at 0.
    pub seq: u64,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Outbox the session pushes to and the application drains.
#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    events: Vec<RecordedEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.events.push(RecordedEvent {
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.events)
    }
}
