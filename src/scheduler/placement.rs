//! Bounded-retry session placement.
//!
//! Shared by combined, lab, and regular placement. The candidate space
//! is the product `days × slot combinations × rooms`; each attempt asks
//! the sampler for one point of it and tries to reserve the faculty,
//! the room, and every attending group at once.
//!
//! # Algorithm
//! 1. Reject immediately if any candidate dimension is empty.
//! 2. Up to `max_attempts` times: sample `(day, combination, room)`,
//!    call [`ConflictIndex::try_reserve`]; stop on the first success.
//! 3. On exhaustion report the attempts spent. Nothing is reserved.

use chrono::Weekday;

use super::conflict::{Claim, ConflictIndex, Epoch};
use super::sampler::CandidateSampler;
use crate::models::{SlotCombination, SlotId, StudentGroup};

/// Everything one placement call needs.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    /// Faculty booked for the session.
    pub faculty: &'a [String],
    /// Groups attending the session.
    pub groups: &'a [StudentGroup],
    /// Candidate days (already excluding days the course uses).
    pub days: &'a [Weekday],
    /// Candidate slot runs.
    pub combinations: &'a [SlotCombination],
    /// Candidate room numbers.
    pub rooms: &'a [String],
    /// Scope.
    pub epoch: Epoch,
    /// Attempt budget.
    pub max_attempts: usize,
}

/// A committed placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub day: Weekday,
    pub combination: SlotCombination,
    pub room: String,
}

/// Result of one placement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Reserved and committed after `attempts` tries.
    Placed { placement: Placement, attempts: usize },
    /// Nothing reserved.
    Unplaced { attempts: usize, reason: String },
}

impl PlacementOutcome {
    /// Attempts spent.
    pub fn attempts(&self) -> usize {
        match self {
            Self::Placed { attempts, .. } | Self::Unplaced { attempts, .. } => *attempts,
        }
    }
}

/// Places one session, reserving its resources on success.
pub fn place_session(
    index: &mut ConflictIndex<Weekday, SlotId>,
    sampler: &mut dyn CandidateSampler,
    request: &PlacementRequest<'_>,
) -> PlacementOutcome {
    let days = request.days.len();
    let combos = request.combinations.len();
    let rooms = request.rooms.len();

    let empty = if days == 0 {
        Some("no free day left for this course")
    } else if combos == 0 {
        Some("no slot combination matches the session length")
    } else if rooms == 0 {
        Some("no eligible room")
    } else {
        None
    };
    if let Some(reason) = empty {
        return PlacementOutcome::Unplaced {
            attempts: 0,
            reason: reason.to_string(),
        };
    }

    let space = days * combos * rooms;
    for attempt in 0..request.max_attempts {
        let point = sampler.pick(attempt, space);
        let day = request.days[point % days];
        let combination = &request.combinations[(point / days) % combos];
        let room = &request.rooms[point / (days * combos)];

        let claim = Claim {
            faculty: request.faculty,
            rooms: std::slice::from_ref(room),
            groups: request.groups,
            day,
            slots: &combination.slots,
            epoch: request.epoch,
        };
        if index.try_reserve(&claim) {
            return PlacementOutcome::Placed {
                placement: Placement {
                    day,
                    combination: combination.clone(),
                    room: room.clone(),
                },
                attempts: attempt + 1,
            };
        }
    }

    PlacementOutcome::Unplaced {
        attempts: request.max_attempts,
        reason: format!(
            "no conflict-free placement within {} attempts",
            request.max_attempts
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotCatalog;
    use crate::scheduler::matcher::match_duration;
    use crate::scheduler::sampler::SequentialSampler;

    #[test]
    fn test_places_on_first_free_candidate() {
        let cat = SlotCatalog::standard();
        let combos = match_duration(&cat, 90, 5);
        let faculty = vec!["Dr. Rao".to_string()];
        let groups = vec![StudentGroup::new("CSE", 1)];
        let rooms = vec!["C1".to_string()];
        let days = [Weekday::Mon, Weekday::Tue];
        let mut index = ConflictIndex::new();
        let req = PlacementRequest {
            faculty: &faculty,
            groups: &groups,
            days: &days,
            combinations: &combos,
            rooms: &rooms,
            epoch: Epoch::FirstHalf,
            max_attempts: 10,
        };

        let first = place_session(&mut index, &mut SequentialSampler, &req);
        match first {
            PlacementOutcome::Placed {
                placement,
                attempts,
            } => {
                assert_eq!(attempts, 1);
                assert_eq!(placement.day, Weekday::Mon);
                assert_eq!(placement.combination.label(), "09:00-10:30");
            }
            other => panic!("expected placement, got {other:?}"),
        }

        // Same request again: Monday morning is taken, Tuesday morning is next
        let second = place_session(&mut index, &mut SequentialSampler, &req);
        match second {
            PlacementOutcome::Placed { placement, .. } => {
                assert_eq!(placement.day, Weekday::Tue);
            }
            other => panic!("expected placement, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_dimension() {
        let mut index = ConflictIndex::new();
        let req = PlacementRequest {
            faculty: &[],
            groups: &[],
            days: &[Weekday::Mon],
            combinations: &[],
            rooms: &["C1".to_string()],
            epoch: Epoch::FirstHalf,
            max_attempts: 10,
        };
        let outcome = place_session(&mut index, &mut SequentialSampler, &req);
        assert_eq!(outcome.attempts(), 0);
        assert!(matches!(outcome, PlacementOutcome::Unplaced { .. }));
    }

    #[test]
    fn test_budget_exhaustion_reserves_nothing() {
        let cat = SlotCatalog::standard();
        let combos = match_duration(&cat, 120, 5);
        let rooms = vec!["L1".to_string()];
        let groups = vec![StudentGroup::new("CSE", 1)];
        let mut index = ConflictIndex::new();
        for c in &combos {
            index.reserve_window(Weekday::Mon, c.slots[0], Epoch::FirstHalf);
        }
        let req = PlacementRequest {
            faculty: &[],
            groups: &groups,
            days: &[Weekday::Mon],
            combinations: &combos,
            rooms: &rooms,
            epoch: Epoch::FirstHalf,
            max_attempts: 8,
        };
        let outcome = place_session(&mut index, &mut SequentialSampler, &req);
        assert_eq!(outcome.attempts(), 8);
        assert_eq!(index.booking_count(), 0);
    }
}
