//! Conflict index.
//!
//! Three independent occupancy maps (faculty, room, student group), each
//! keyed by `(identity, day, slot, epoch)`. A [`Claim`] bundles every
//! resource a placement needs; [`ConflictIndex::try_reserve`] either
//! marks all of it or nothing.
//!
//! # Intakes
//! A group without a section stands for its whole intake. It is busy
//! whenever any section of the intake is booked, and every section is
//! busy whenever the whole intake is booked.
//!
//! # Epochs
//! Keys carry an [`Epoch`] so that the two semester halves and the exam
//! period never conflict with each other, even for identical identities,
//! days, and slots.
//!
//! # Reserved Slots
//! Elective windows are seeded as held by a synthetic reserved identity
//! before any placement. Every claim touching a reserved
//! `(day, slot, epoch)` fails, whatever its resources.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::models::{Half, StudentGroup};

/// An isolated scheduling scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Epoch {
    FirstHalf,
    SecondHalf,
    ExamPeriod,
}

impl From<Half> for Epoch {
    fn from(half: Half) -> Self {
        match half {
            Half::First => Epoch::FirstHalf,
            Half::Second => Epoch::SecondHalf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OccupancyKey<I, D, S> {
    identity: I,
    day: D,
    slot: S,
    epoch: Epoch,
}

/// Every resource a placement occupies over a set of slots on one day.
#[derive(Debug, Clone, Copy)]
pub struct Claim<'a, D, S> {
    /// Faculty (or invigilators) booked.
    pub faculty: &'a [String],
    /// Rooms booked.
    pub rooms: &'a [String],
    /// Student groups attending.
    pub groups: &'a [StudentGroup],
    /// Day or date.
    pub day: D,
    /// Occupied slots.
    pub slots: &'a [S],
    /// Scope.
    pub epoch: Epoch,
}

/// Occupancy maps for one run.
///
/// `D` is the day type (weekday or date), `S` the slot type.
#[derive(Debug, Clone)]
pub struct ConflictIndex<D, S> {
    faculty: HashSet<OccupancyKey<String, D, S>>,
    rooms: HashSet<OccupancyKey<String, D, S>>,
    groups: HashSet<OccupancyKey<StudentGroup, D, S>>,
    intakes: HashSet<OccupancyKey<StudentGroup, D, S>>,
    reserved: HashSet<(D, S, Epoch)>,
}

impl<D, S> Default for ConflictIndex<D, S> {
    fn default() -> Self {
        Self {
            faculty: HashSet::new(),
            rooms: HashSet::new(),
            groups: HashSet::new(),
            intakes: HashSet::new(),
            reserved: HashSet::new(),
        }
    }
}

impl<D, S> ConflictIndex<D, S>
where
    D: Copy + Eq + Hash,
    S: Copy + Eq + Hash,
{
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a slot as permanently held by the reserved identity.
    pub fn reserve_window(&mut self, day: D, slot: S, epoch: Epoch) {
        self.reserved.insert((day, slot, epoch));
    }

    /// Whether a slot is held by the reserved identity.
    pub fn is_reserved(&self, day: D, slot: S, epoch: Epoch) -> bool {
        self.reserved.contains(&(day, slot, epoch))
    }

    /// Whether a faculty member is booked at a slot.
    pub fn faculty_busy(&self, name: &str, day: D, slot: S, epoch: Epoch) -> bool {
        self.faculty.contains(&key(name.to_string(), day, slot, epoch))
    }

    /// Whether a room is booked at a slot.
    pub fn room_busy(&self, room: &str, day: D, slot: S, epoch: Epoch) -> bool {
        self.rooms.contains(&key(room.to_string(), day, slot, epoch))
    }

    /// Whether any student of the group is booked at a slot.
    pub fn group_busy(&self, group: &StudentGroup, day: D, slot: S, epoch: Epoch) -> bool {
        let intake = key(group.intake(), day, slot, epoch);
        if group.section.is_none() {
            return self.intakes.contains(&intake);
        }
        self.groups.contains(&intake)
            || self.groups.contains(&key(group.clone(), day, slot, epoch))
    }

    /// Whether every resource of the claim is free at every slot.
    pub fn is_free(&self, claim: &Claim<'_, D, S>) -> bool {
        let Claim {
            faculty,
            rooms,
            groups,
            day,
            slots,
            epoch,
        } = *claim;

        slots.iter().all(|&slot| {
            !self.is_reserved(day, slot, epoch)
                && faculty
                    .iter()
                    .all(|f| !self.faculty_busy(f, day, slot, epoch))
                && rooms.iter().all(|r| !self.room_busy(r, day, slot, epoch))
                && groups
                    .iter()
                    .all(|g| !self.group_busy(g, day, slot, epoch))
        })
    }

    /// Reserves every resource of the claim at every slot.
    ///
    /// Returns `false` and reserves nothing if any of them is already
    /// held (or the slot is reserved).
    pub fn try_reserve(&mut self, claim: &Claim<'_, D, S>) -> bool {
        if !self.is_free(claim) {
            return false;
        }

        let Claim {
            faculty,
            rooms,
            groups,
            day,
            slots,
            epoch,
        } = *claim;

        for &slot in slots {
            for f in faculty {
                self.faculty.insert(key(f.clone(), day, slot, epoch));
            }
            for r in rooms {
                self.rooms.insert(key(r.clone(), day, slot, epoch));
            }
            for g in groups {
                self.groups.insert(key(g.clone(), day, slot, epoch));
                self.intakes.insert(key(g.intake(), day, slot, epoch));
            }
        }
        true
    }

    /// Number of (resource, slot) bookings held, reserved slots excluded.
    pub fn booking_count(&self) -> usize {
        self.faculty.len() + self.rooms.len() + self.groups.len()
    }
}

fn key<I, D, S>(identity: I, day: D, slot: S, epoch: Epoch) -> OccupancyKey<I, D, S> {
    OccupancyKey {
        identity,
        day,
        slot,
        epoch,
    }
}
