//! Timetable and exam schedulers, their building blocks, and KPIs.
//!
//! # Algorithm
//!
//! Both schedulers are greedy, constraint-driven placement heuristics.
//! Neither is optimal; both are fast and always return whatever they
//! could place, reporting the rest.
//!
//! - [`ClassScheduler`]: bounded random retries per session over
//!   `days × slot combinations × rooms`, with labs relaxed through three
//!   slot strategies and multi-session courses spread over distinct days.
//! - [`ExamScheduler`]: per-intake rolling cursor over `(date, sitting)`
//!   pairs with capacity-driven room counts and room-invigilator pairing.
//!
//! Both share one [`ConflictIndex`], keyed by resource, day, slot, and
//! [`Epoch`], with atomic all-or-nothing reservation.
//!
//! # KPI
//!
//! [`TimetableKpi`] and [`ExamKpi`] summarize placement rate, day spread,
//! room utilization, and invigilator load.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated Timetabling"

mod conflict;
mod exam;
mod kpi;
mod matcher;
mod placement;
mod sampler;
mod timetable;

pub use conflict::{Claim, ConflictIndex, Epoch};
pub use exam::{exam_dates, generate_exam_schedule, ExamScheduler};
pub use kpi::{ExamKpi, TimetableKpi};
pub use matcher::{match_duration, DurationMatcher};
pub use placement::{place_session, Placement, PlacementOutcome, PlacementRequest};
pub use sampler::{CandidateSampler, RandomSampler, SequentialSampler};
pub use timetable::{generate_class_timetable, ClassScheduler};
