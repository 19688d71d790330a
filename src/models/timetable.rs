//! Class timetable (solution) model.
//!
//! A timetable is the flat list of committed sessions for both semester
//! halves, plus the sessions that could not be placed within their
//! attempt budget and any diagnostics raised during the run.
//!
//! Sessions are immutable once committed: the scheduler only appends.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{Diagnostic, Half, SessionType, StudentGroup, TimeSlot};

/// A committed class session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Day of the week.
    pub day: Weekday,
    /// Occupied catalog slots, chronological.
    pub slots: Vec<TimeSlot>,
    /// Span label, e.g. `09:00-10:30`.
    pub time_label: String,
    /// Course code.
    pub course_code: String,
    /// Course title.
    pub course_name: String,
    /// Session label, e.g. `Lecture 1 of 2`.
    pub session_label: String,
    /// Session kind.
    pub session_type: SessionType,
    /// Booked faculty.
    pub faculty: Vec<String>,
    /// Booked room number.
    pub room: String,
    /// Branch of the attending cohort(s).
    pub branch: String,
    /// Year of the attending cohort(s).
    pub year: u8,
    /// Section of the natural cohort (`None` for combined or unsectioned).
    pub section: Option<String>,
    /// Every attending student group.
    pub groups: Vec<StudentGroup>,
    /// Semester half this session belongs to.
    pub half: Half,
    /// Whether several sections attend together.
    pub combined: bool,
}

impl Session {
    /// Start of the first slot (minutes after midnight).
    pub fn start_minute(&self) -> u16 {
        self.slots.first().map(|s| s.start_minute).unwrap_or(0)
    }

    /// End of the last slot (minutes after midnight).
    pub fn end_minute(&self) -> u16 {
        self.slots.last().map(|s| s.end_minute).unwrap_or(0)
    }

    /// Teaching minutes (sum of slot durations, breaks excluded).
    pub fn duration_minutes(&self) -> u32 {
        self.slots.iter().map(TimeSlot::duration_minutes).sum()
    }

    /// Whether two sessions share a day, a half, and any slot time.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day
            && self.half == other.half
            && self
                .slots
                .iter()
                .any(|a| other.slots.iter().any(|b| a.overlaps(b)))
    }

    /// Whether students of the given group attend this session.
    ///
    /// A whole-intake session is attended by each of its sections.
    pub fn attended_by(&self, group: &StudentGroup) -> bool {
        self.groups.iter().any(|g| g.shares_students(group))
    }
}

/// A session that found no conflict-free placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedSession {
    /// Course code.
    pub course_code: String,
    /// Session label.
    pub session_label: String,
    /// Session kind.
    pub session_type: SessionType,
    /// Groups that would have attended.
    pub groups: Vec<StudentGroup>,
    /// Semester half.
    pub half: Half,
    /// Placement attempts spent.
    pub attempts: usize,
    /// Why placement failed.
    pub reason: String,
}

/// Result of a class timetable run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    /// Committed sessions.
    pub sessions: Vec<Session>,
    /// Sessions left unplaced.
    pub unplaced: Vec<UnplacedSession>,
    /// Warnings raised before or during placement.
    pub warnings: Vec<Diagnostic>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a committed session.
    pub fn add_session(&mut self, session: Session) {
        self.sessions.push(session);
    }

    /// Records an unplaced session.
    pub fn add_unplaced(&mut self, unplaced: UnplacedSession) {
        self.unplaced.push(unplaced);
    }

    /// Records a warning.
    pub fn add_warning(&mut self, warning: Diagnostic) {
        self.warnings.push(warning);
    }

    /// Whether every requested session was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Number of committed sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of unplaced sessions.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Sessions attended by a group.
    pub fn sessions_for_group(&self, group: &StudentGroup) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.attended_by(group)).collect()
    }

    /// Sessions taught by a faculty member.
    pub fn sessions_for_faculty(&self, name: &str) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.faculty.iter().any(|f| f == name))
            .collect()
    }

    /// Sessions held in a room.
    pub fn sessions_for_room(&self, room: &str) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.room == room).collect()
    }

    /// Sessions of one course (all types sharing the code).
    pub fn sessions_for_course(&self, code: &str) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.course_code == code)
            .collect()
    }

    /// Sessions in one semester half.
    pub fn sessions_in_half(&self, half: Half) -> Vec<&Session> {
        self.sessions.iter().filter(|s| s.half == half).collect()
    }
}
