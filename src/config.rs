//! Run configuration.
//!
//! Both configs deserialize with defaults for every missing field, so a
//! host can supply a partial JSON object (or none at all).

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::{Course, ElectiveWindow, ExamSlot, Half, SemesterHalf, ELECTIVE_WINDOWS};

/// How unflagged (full-semester) courses are split between halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum FullSemesterPolicy {
    /// Every unflagged course is scheduled in both halves.
    BothHalves,
    /// Unflagged courses with at least `min_credits` credits run in both
    /// halves; lighter ones only in the second half.
    CreditThreshold { min_credits: u8 },
}

impl Default for FullSemesterPolicy {
    fn default() -> Self {
        Self::CreditThreshold { min_credits: 3 }
    }
}

impl FullSemesterPolicy {
    /// Whether `course` is scheduled in `half`.
    pub fn includes(&self, course: &Course, half: Half) -> bool {
        match (course.semester_half, half) {
            (SemesterHalf::FirstOnly, h) => h == Half::First,
            (SemesterHalf::SecondOnly, h) => h == Half::Second,
            (SemesterHalf::Full, Half::Second) => true,
            (SemesterHalf::Full, Half::First) => match self {
                Self::BothHalves => true,
                Self::CreditThreshold { min_credits } => course.credits >= *min_credits,
            },
        }
    }
}

/// Configuration for class timetable runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Attempt budget per session placement call.
    pub max_attempts: usize,
    /// Duration matcher tolerance (minutes, either side).
    pub tolerance_minutes: u32,
    /// Capacity at which a room counts as large (combined sessions).
    pub large_room_capacity: u32,
    /// Teaching days.
    pub days: Vec<Weekday>,
    /// Weekly windows closed to regular sessions.
    pub elective_windows: Vec<ElectiveWindow>,
    /// Split rule for unflagged courses.
    pub full_semester_policy: FullSemesterPolicy,
    /// Seed for the random sampler; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            max_attempts: 500,
            tolerance_minutes: 5,
            large_room_capacity: 120,
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            elective_windows: ELECTIVE_WINDOWS.to_vec(),
            full_semester_policy: FullSemesterPolicy::default(),
            seed: None,
        }
    }
}

impl TimetableConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the matcher tolerance.
    pub fn with_tolerance(mut self, minutes: u32) -> Self {
        self.tolerance_minutes = minutes;
        self
    }

    /// Sets the large-room threshold.
    pub fn with_large_room_capacity(mut self, capacity: u32) -> Self {
        self.large_room_capacity = capacity;
        self
    }

    /// Sets the teaching days.
    pub fn with_days(mut self, days: Vec<Weekday>) -> Self {
        self.days = days;
        self
    }

    /// Replaces the elective windows.
    pub fn with_elective_windows(mut self, windows: Vec<ElectiveWindow>) -> Self {
        self.elective_windows = windows;
        self
    }

    /// Sets the full-semester split rule.
    pub fn with_full_semester_policy(mut self, policy: FullSemesterPolicy) -> Self {
        self.full_semester_policy = policy;
        self
    }

    /// Seeds the random sampler.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Order in which exams of one intake pick their dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamOrdering {
    /// Descending credits, then descending student count.
    #[default]
    CreditsThenStudents,
    /// Descending student count only.
    StudentsOnly,
}

/// Configuration for exam scheduling runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamConfig {
    /// Students seated per room (one invigilator each).
    pub students_per_room: u32,
    /// Weekly day with no exams.
    pub rest_day: Weekday,
    /// Exam priority within an intake.
    pub ordering: ExamOrdering,
    /// Sittings offered on each exam date, in day order.
    pub slots: Vec<ExamSlot>,
    /// `chrono` format string for display dates.
    pub display_format: String,
    /// Label for the forenoon sitting.
    pub forenoon_label: String,
    /// Label for the afternoon sitting.
    pub afternoon_label: String,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            students_per_room: 30,
            rest_day: Weekday::Sun,
            ordering: ExamOrdering::default(),
            slots: ExamSlot::ALL.to_vec(),
            display_format: "%d-%m-%Y".to_string(),
            forenoon_label: ExamSlot::Forenoon.default_label().to_string(),
            afternoon_label: ExamSlot::Afternoon.default_label().to_string(),
        }
    }
}

impl ExamConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the students seated per room.
    pub fn with_students_per_room(mut self, students: u32) -> Self {
        self.students_per_room = students;
        self
    }

    /// Sets the rest day.
    pub fn with_rest_day(mut self, day: Weekday) -> Self {
        self.rest_day = day;
        self
    }

    /// Sets the exam ordering.
    pub fn with_ordering(mut self, ordering: ExamOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the sittings offered per date.
    pub fn with_slots(mut self, slots: Vec<ExamSlot>) -> Self {
        self.slots = slots;
        self
    }

    /// Label for a sitting.
    pub fn slot_label(&self, slot: ExamSlot) -> &str {
        match slot {
            ExamSlot::Forenoon => &self.forenoon_label,
            ExamSlot::Afternoon => &self.afternoon_label,
        }
    }

    /// Rooms needed to seat `students`: `ceil(students / students_per_room)`.
    ///
    /// Exams with no students are rejected during input validation.
    pub fn rooms_needed(&self, students: u32) -> usize {
        let per_room = self.students_per_room.max(1);
        students.div_ceil(per_room) as usize
    }
}
