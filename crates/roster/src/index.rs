use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use foundation::Chamber;
use tracing::{debug, warn};

use crate::member::RosterMember;

/// Constant-time lookups over one chamber's roster snapshot.
///
/// Built once per roster list and never mutated; a new list means a new
/// index. For the House, each `(state, district)` seat maps to one member
/// (`None` is the at-large seat). When the list repeats a seat the first
/// member wins and the repeat is logged.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    members: Vec<RosterMember>,
    by_state: HashMap<String, Vec<RosterMember>>,
    by_seat: HashMap<String, HashMap<Option<u32>, RosterMember>>,
    duplicate_seats: usize,
}

impl RosterIndex {
    pub fn build(chamber: Chamber, members: Vec<RosterMember>) -> Self {
        let mut by_state: HashMap<String, Vec<RosterMember>> = HashMap::new();
        let mut by_seat: HashMap<String, HashMap<Option<u32>, RosterMember>> = HashMap::new();
        let mut duplicate_seats = 0;

        let members: Vec<RosterMember> = members
            .into_iter()
            .filter(|member| {
                let matches = member.chamber == chamber;
                if !matches {
                    warn!(
                        name = %member.name,
                        expected = %chamber,
                        found = %member.chamber,
                        "roster member filed under the wrong chamber; skipping"
                    );
                }
                matches
            })
            .collect();

        for member in &members {
            by_state
                .entry(member.state.clone())
                .or_default()
                .push(member.clone());

            if chamber == Chamber::House {
                let seats = by_seat.entry(member.state.clone()).or_default();
                match seats.entry(member.district) {
                    Entry::Occupied(kept) => {
                        duplicate_seats += 1;
                        warn!(
                            state = %member.state,
                            district = ?member.district,
                            kept = %kept.get().name,
                            dropped = %member.name,
                            "duplicate House seat in roster"
                        );
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(member.clone());
                    }
                }
            }
        }

        debug!(
            %chamber,
            members = members.len(),
            states = by_state.len(),
            duplicate_seats,
            "built roster index"
        );

        Self {
            members,
            by_state,
            by_seat,
            duplicate_seats,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in their original roster order.
    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    /// Everyone representing `state`, in roster order. Empty for vacancies and
    /// unknown states.
    pub fn by_state(&self, state: &str) -> &[RosterMember] {
        self.by_state.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The House member holding a seat. `district = None` is the at-large seat.
    pub fn by_state_and_district(&self, state: &str, district: Option<u32>) -> Option<&RosterMember> {
        self.by_seat.get(state)?.get(&district)
    }

    /// Seats dropped because an earlier member already held them.
    pub fn duplicate_seats(&self) -> usize {
        self.duplicate_seats
    }

    /// Case-insensitive match on name or state, or exact match on the district
    /// number (padded or not). An empty query returns everyone.
    pub fn search(&self, query: &str) -> Vec<&RosterMember> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.members.iter().collect();
        }
        let district_query = query.parse::<u32>().ok();
        self.members
            .iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&query)
                    || m.state.to_lowercase().contains(&query)
                    || (district_query.is_some() && m.district == district_query)
            })
            .collect()
    }
}

/// Current index for each chamber. Replacing one chamber's list rebuilds
/// only that chamber's index; readers holding the old `Arc` keep a
/// consistent snapshot.
#[derive(Debug, Clone)]
pub struct Rosters {
    house: Arc<RosterIndex>,
    senate: Arc<RosterIndex>,
}

impl Default for Rosters {
    fn default() -> Self {
        Self {
            house: Arc::new(RosterIndex::default()),
            senate: Arc::new(RosterIndex::default()),
        }
    }
}

impl Rosters {
    pub fn new(house: Vec<RosterMember>, senate: Vec<RosterMember>) -> Self {
        Self {
            house: Arc::new(RosterIndex::build(Chamber::House, house)),
            senate: Arc::new(RosterIndex::build(Chamber::Senate, senate)),
        }
    }

    pub fn get(&self, chamber: Chamber) -> Arc<RosterIndex> {
        match chamber {
            Chamber::House => self.house.clone(),
            Chamber::Senate => self.senate.clone(),
        }
    }

    pub fn replace(&mut self, chamber: Chamber, members: Vec<RosterMember>) -> Arc<RosterIndex> {
        let index = Arc::new(RosterIndex::build(chamber, members));
        match chamber {
            Chamber::House => self.house = index.clone(),
            Chamber::Senate => self.senate = index.clone(),
        }
        index
    }
}
