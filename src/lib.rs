//! Academic timetabling for the U-Engine ecosystem.
//!
//! Places class sessions (lectures, tutorials, labs) into a weekly slot
//! grid and examinations into dated sittings, under faculty, room, and
//! student-group exclusivity.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `Room`, `StudentGroup`,
//!   `SlotCatalog`, `Session`, `Timetable`, `ExamCourse`, `ExamSchedule`
//! - **`scheduler`**: Duration matcher, conflict index, class and exam
//!   schedulers, KPIs
//! - **`config`**: Run configuration (`TimetableConfig`, `ExamConfig`)
//! - **`validation`**: Input checks and output invariant checks
//! - **`error`**: `TimetableError`
//!
//! # Architecture
//!
//! Input is flat records; output is flat records. Storage, rendering, and
//! export belong to the host. Unplaceable sessions and exams are part of
//! the result, never an error; only malformed input rejects a run.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Carter & Laporte (1996), "Recent Developments in Practical
//!   Examination Timetabling"

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::{ExamConfig, TimetableConfig};
pub use error::{Result, TimetableError};
pub use scheduler::{
    generate_class_timetable, generate_exam_schedule, ClassScheduler, ExamScheduler,
};
