//! Examination models.
//!
//! An exam period is a run of calendar dates (rest day excluded), each
//! with one or two sittings. Each theory course gets one sitting; the
//! sitting is given enough rooms for its students and exactly one
//! invigilator per room.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::StudentGroup;

/// Exam category. Only theory exams are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamType {
    #[default]
    #[serde(alias = "theory", alias = "THEORY")]
    Theory,
    #[serde(alias = "practical", alias = "Lab", alias = "lab")]
    Practical,
    /// Any other label (project, viva...).
    #[serde(other)]
    Other,
}

/// A course sitting an examination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamCourse {
    /// Course code.
    pub code: String,
    /// Course title.
    #[serde(default)]
    pub name: String,
    /// Credit weight.
    #[serde(default)]
    pub credits: u8,
    /// Branch / department code.
    pub branch: String,
    /// Year of study.
    pub year: u8,
    /// Registered students.
    pub students: u32,
    /// Exam category.
    #[serde(default)]
    pub exam_type: ExamType,
    /// Course instructor, preferred as first invigilator.
    #[serde(default)]
    pub faculty: Option<String>,
}

impl ExamCourse {
    /// Creates a theory exam.
    pub fn new(
        code: impl Into<String>,
        branch: impl Into<String>,
        year: u8,
        students: u32,
    ) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            credits: 0,
            branch: branch.into(),
            year,
            students,
            exam_type: ExamType::Theory,
            faculty: None,
        }
    }

    /// Sets the course title.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the credit weight.
    pub fn with_credits(mut self, credits: u8) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the exam category.
    pub fn with_type(mut self, exam_type: ExamType) -> Self {
        self.exam_type = exam_type;
        self
    }

    /// Sets the instructor.
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = Some(faculty.into());
        self
    }

    /// The `(branch, year)` intake sitting this exam.
    pub fn group(&self) -> StudentGroup {
        StudentGroup::new(self.branch.clone(), self.year)
    }

    /// Whether this exam is scheduled at all.
    pub fn is_schedulable(&self) -> bool {
        self.exam_type == ExamType::Theory
    }
}

/// A sitting within an exam day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExamSlot {
    #[serde(alias = "FN")]
    Forenoon,
    #[serde(alias = "AN")]
    Afternoon,
}

impl ExamSlot {
    /// Both sittings, in day order.
    pub const ALL: [ExamSlot; 2] = [ExamSlot::Forenoon, ExamSlot::Afternoon];

    /// Default display label.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Forenoon => "Forenoon (09:30-12:30)",
            Self::Afternoon => "Afternoon (14:00-17:00)",
        }
    }
}

/// A usable exam date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDate {
    /// Calendar date (serialized as ISO `YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Display form of the date.
    pub display: String,
    /// Weekday name, e.g. `Monday`.
    pub weekday: String,
}

/// An exam invigilator. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Invigilator {
    pub name: String,
}

impl Invigilator {
    /// Creates an invigilator.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One room of a sitting and the invigilator watching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDuty {
    pub room: String,
    pub invigilator: String,
}

/// A scheduled exam sitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamAssignment {
    /// Calendar date.
    pub date: NaiveDate,
    /// Display form of the date.
    pub display_date: String,
    /// Weekday name.
    pub weekday: String,
    /// Sitting.
    pub slot: ExamSlot,
    /// Sitting label.
    pub slot_label: String,
    /// Course code.
    pub course_code: String,
    /// Course title.
    pub course_name: String,
    /// Credit weight.
    pub credits: u8,
    /// Branch.
    pub branch: String,
    /// Year.
    pub year: u8,
    /// Registered students.
    pub students: u32,
    /// Allocated rooms.
    pub rooms: Vec<String>,
    /// Allocated invigilators, parallel to `rooms`.
    pub invigilators: Vec<String>,
    /// Room-invigilator pairs.
    pub duties: Vec<RoomDuty>,
}

/// A theory exam that could not be given a sitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnscheduledExam {
    /// Course code.
    pub course_code: String,
    /// Branch.
    pub branch: String,
    /// Year.
    pub year: u8,
    /// Registered students.
    pub students: u32,
    /// Rooms (and invigilators) the sitting needs.
    pub rooms_needed: usize,
    /// (date, slot) pairs examined.
    pub attempts: usize,
    /// Why no sitting was found.
    pub reason: String,
}

/// Result of an exam scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSchedule {
    /// Scheduled sittings.
    pub assignments: Vec<ExamAssignment>,
    /// Theory exams left unscheduled.
    pub unscheduled: Vec<UnscheduledExam>,
    /// Warnings raised before scheduling.
    pub warnings: Vec<super::Diagnostic>,
}

impl ExamSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every theory exam got a sitting.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    /// Number of scheduled sittings.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Sittings held on a date.
    pub fn assignments_on(&self, date: NaiveDate) -> Vec<&ExamAssignment> {
        self.assignments.iter().filter(|a| a.date == date).collect()
    }

    /// Sittings for a `(branch, year)` intake.
    pub fn assignments_for_group(&self, branch: &str, year: u8) -> Vec<&ExamAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.branch == branch && a.year == year)
            .collect()
    }

    /// Number of rooms an invigilator watches over the whole period.
    pub fn duty_count(&self, invigilator: &str) -> usize {
        self.assignments
            .iter()
            .flat_map(|a| a.invigilators.iter())
            .filter(|name| name.as_str() == invigilator)
            .count()
    }
}
