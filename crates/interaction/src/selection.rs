//! Hover/click state machine over one chamber's roster.
//!
//! Transitions are total: every event in every state yields an [`Outcome`],
//! and events that make no sense in the current state come back as
//! [`Outcome::Ignored`] without touching it.

use std::sync::Arc;

use foundation::Chamber;
use roster::{RosterIndex, RosterMember};
use tracing::debug;

use crate::pointer::{PointerEvent, ScreenPoint};
use crate::preview::HoverPreview;
use crate::resolver::{Region, RegionError, Resolution, locate, lookup};

#[derive(Debug, Clone, PartialEq)]
pub struct Hover {
    pub position: ScreenPoint,
    pub located: Result<Region, RegionError>,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    Hovering(Hover),
    AwaitingDisambiguation {
        candidates: Vec<RosterMember>,
        /// Selection to fall back to on dismiss.
        restore: Option<RosterMember>,
    },
    Selected(RosterMember),
}

/// Something the application must react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEffect {
    Selected(RosterMember),
    DisambiguationRequested(Vec<RosterMember>),
    NotFound { position: ScreenPoint },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ignored,
    Changed,
    Effect(SelectionEffect),
}

#[derive(Debug)]
pub struct SelectionCoordinator {
    chamber: Chamber,
    index: Arc<RosterIndex>,
    state: SelectionState,
}

impl SelectionCoordinator {
    pub fn new(chamber: Chamber, index: Arc<RosterIndex>) -> Self {
        Self {
            chamber,
            index,
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn chamber(&self) -> Chamber {
        self.chamber
    }

    pub fn index(&self) -> &Arc<RosterIndex> {
        &self.index
    }

    /// Tooltip for the current hover, if any.
    pub fn preview(&self) -> Option<HoverPreview> {
        match &self.state {
            SelectionState::Hovering(hover) => Some(HoverPreview::new(
                self.chamber,
                hover.position,
                &hover.located,
                &hover.resolution,
            )),
            _ => None,
        }
    }

    pub fn pointer_moved(&mut self, event: PointerEvent<'_>) -> Outcome {
        if matches!(self.state, SelectionState::AwaitingDisambiguation { .. }) {
            return Outcome::Ignored;
        }
        let Some(feature) = event.feature else {
            return self.reset();
        };
        let located = locate(feature, self.chamber);
        let resolution = self.lookup(&located);
        self.state = SelectionState::Hovering(Hover {
            position: event.position,
            located,
            resolution,
        });
        Outcome::Changed
    }

    /// Ignored while a disambiguation choice is open: the pointer leaves the
    /// map to reach the choice dialog.
    pub fn pointer_left(&mut self) -> Outcome {
        if matches!(self.state, SelectionState::AwaitingDisambiguation { .. }) {
            return Outcome::Ignored;
        }
        self.reset()
    }

    pub fn clicked(&mut self, event: PointerEvent<'_>) -> Outcome {
        if matches!(self.state, SelectionState::AwaitingDisambiguation { .. }) {
            return Outcome::Ignored;
        }
        let Some(feature) = event.feature else {
            return Outcome::Ignored;
        };
        let located = locate(feature, self.chamber);
        match self.lookup(&located) {
            Resolution::NoMatch => Outcome::Effect(SelectionEffect::NotFound {
                position: event.position,
            }),
            Resolution::Single(member) => {
                self.state = SelectionState::Selected(member.clone());
                Outcome::Effect(SelectionEffect::Selected(member))
            }
            Resolution::Candidates(candidates) => {
                let restore = match &self.state {
                    SelectionState::Selected(m) => Some(m.clone()),
                    _ => None,
                };
                self.state = SelectionState::AwaitingDisambiguation {
                    candidates: candidates.clone(),
                    restore,
                };
                Outcome::Effect(SelectionEffect::DisambiguationRequested(candidates))
            }
        }
    }

    /// Commits one of the offered candidates.
    pub fn pick(&mut self, member: &RosterMember) -> Outcome {
        let SelectionState::AwaitingDisambiguation { candidates, .. } = &self.state else {
            return Outcome::Ignored;
        };
        let Some(chosen) = candidates.iter().find(|c| *c == member).cloned() else {
            debug!(name = %member.name, "pick of a non-candidate ignored");
            return Outcome::Ignored;
        };
        self.state = SelectionState::Selected(chosen.clone());
        Outcome::Effect(SelectionEffect::Selected(chosen))
    }

    pub fn dismiss(&mut self) -> Outcome {
        let SelectionState::AwaitingDisambiguation { restore, .. } = &mut self.state else {
            return Outcome::Ignored;
        };
        self.state = match restore.take() {
            Some(member) => SelectionState::Selected(member),
            None => SelectionState::Idle,
        };
        Outcome::Changed
    }

    pub fn clear(&mut self) -> Outcome {
        self.reset()
    }

    /// Moves to another chamber. Returns to `Idle` only if the chamber
    /// actually changes; the index is replaced either way.
    pub fn switch_chamber(&mut self, chamber: Chamber, index: Arc<RosterIndex>) -> Outcome {
        self.index = index;
        if chamber == self.chamber {
            return Outcome::Ignored;
        }
        self.chamber = chamber;
        self.state = SelectionState::Idle;
        Outcome::Changed
    }

    /// New roster snapshot for the current chamber. The current state is
    /// kept; the next pointer event resolves against the new index.
    pub fn replace_index(&mut self, index: Arc<RosterIndex>) {
        self.index = index;
    }

    fn reset(&mut self) -> Outcome {
        if self.state == SelectionState::Idle {
            return Outcome::Ignored;
        }
        self.state = SelectionState::Idle;
        Outcome::Changed
    }

    fn lookup(&self, located: &Result<Region, RegionError>) -> Resolution {
        match located {
            Ok(region) => lookup(region, &self.index),
            Err(err) => {
                debug!(chamber = %self.chamber, "unresolvable feature: {err}");
                Resolution::NoMatch
            }
        }
    }
}
