//! Timetabling domain models.
//!
//! Provides the flat input records consumed by the schedulers and the
//! flat output records they return. All records are serde-enabled so a
//! host can load and persist them without extra mapping.
//!
//! # Domain Mappings
//!
//! | u-timetable | Class timetable | Exam period |
//! |-------------|-----------------|-------------|
//! | Day | `chrono::Weekday` | `chrono::NaiveDate` |
//! | Slot | Catalog [`TimeSlot`] | [`ExamSlot`] |
//! | Resource | Faculty / Room / StudentGroup | Invigilator / Room |
//! | Output | [`Session`] | [`ExamAssignment`] |

mod course;
mod diagnostic;
mod exam;
mod group;
mod room;
mod slot;
mod timetable;

pub use course::{Course, Faculty, Half, SemesterHalf, SessionType};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use exam::{
    ExamAssignment, ExamCourse, ExamDate, ExamSchedule, ExamSlot, ExamType, Invigilator, RoomDuty,
    UnscheduledExam,
};
pub use group::StudentGroup;
pub use room::{largest_room, Room, RoomKind};
pub use slot::{
    ContinuousBlock, ElectiveWindow, SlotCatalog, SlotCombination, SlotId, TimeSlot,
    ELECTIVE_WINDOWS,
};
pub use timetable::{Session, Timetable, UnplacedSession};
