//! Room model.
//!
//! Rooms host class sessions and examinations. The room kind restricts
//! eligibility: labs run in lab rooms, lectures and tutorials in
//! classrooms. Capacity decides which room a combined session gets.

use serde::{Deserialize, Serialize};

/// Room classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Lecture / tutorial room.
    #[default]
    #[serde(alias = "classroom", alias = "Lecture")]
    Classroom,
    /// Laboratory.
    #[serde(alias = "lab", alias = "Laboratory")]
    Lab,
}

/// A room that can host sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room number.
    pub number: String,
    /// Seats available.
    #[serde(default)]
    pub capacity: u32,
    /// Room classification.
    #[serde(default)]
    pub kind: RoomKind,
}

impl Room {
    /// Creates a new room.
    pub fn new(number: impl Into<String>, kind: RoomKind) -> Self {
        Self {
            number: number.into(),
            capacity: 0,
            kind,
        }
    }

    /// Creates a classroom.
    pub fn classroom(number: impl Into<String>) -> Self {
        Self::new(number, RoomKind::Classroom)
    }

    /// Creates a lab.
    pub fn lab(number: impl Into<String>) -> Self {
        Self::new(number, RoomKind::Lab)
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether the room can host a session needing `kind`.
    pub fn accepts(&self, kind: RoomKind) -> bool {
        self.kind == kind
    }
}

/// Returns the room with the largest capacity (first on ties).
pub fn largest_room(rooms: &[Room]) -> Option<&Room> {
    rooms
        .iter()
        .reduce(|best, r| if r.capacity > best.capacity { r } else { best })
}
