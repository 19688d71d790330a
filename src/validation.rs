//! Input validation and output invariant checks.
//!
//! Input checks run before scheduling and reject the whole run. They
//! detect:
//! - Empty resource pools (rooms, faculty, invigilators, dates, sittings)
//! - Duplicate identities
//! - Missing required fields
//!
//! Output checks independently re-verify a finished timetable or exam
//! schedule:
//! - No faculty, room, or student group in two overlapping sessions
//! - Multi-session courses on pairwise distinct days
//! - No session inside an elective window
//! - At most one exam per intake per date
//! - One invigilator per exam room, none double-booked per sitting

use std::collections::{HashMap, HashSet};

use crate::config::ExamConfig;
use crate::models::{
    Course, ElectiveWindow, ExamCourse, ExamDate, ExamSchedule, Faculty, Invigilator, Room,
    SlotCatalog, TimeSlot, Timetable,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same identity.
    DuplicateId,
    /// A resource pool the run needs is empty.
    EmptyPool,
    /// A required field is blank.
    MissingField,
    /// A field holds an unusable value.
    InvalidValue,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates class timetable input.
///
/// Checks:
/// 1. The room pool is not empty; nor is the faculty roster when there
///    are courses
/// 2. No duplicate room numbers or faculty names
/// 3. Every course has a code, a branch, a year, and at least one faculty
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_class_input(
    courses: &[Course],
    faculty: &[Faculty],
    rooms: &[Room],
) -> ValidationResult {
    let mut errors = Vec::new();

    if rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyPool,
            "No rooms available",
        ));
    }
    if faculty.is_empty() && !courses.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyPool,
            "No faculty on the roster",
        ));
    }

    check_rooms(rooms, &mut errors);

    let mut names = HashSet::new();
    for f in faculty {
        if !names.insert(f.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate faculty name: {}", f.name),
            ));
        }
    }

    for course in courses {
        if course.code.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Course for {}-{} has no code", course.branch, course.year),
            ));
        }
        if course.branch.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Course '{}' has no branch", course.code),
            ));
        }
        if course.year == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Course '{}' has year 0", course.code),
            ));
        }
        if course.faculty.iter().all(|f| f.trim().is_empty()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Course '{}' has no faculty", course.code),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates exam scheduling input.
///
/// Checks:
/// 1. Rooms, invigilators, dates, and sittings are all non-empty
/// 2. `students_per_room` is positive
/// 3. No duplicate room numbers, invigilator names, or sittings
/// 4. Every exam has a code, a branch, and a year
pub fn validate_exam_input(
    courses: &[ExamCourse],
    invigilators: &[Invigilator],
    rooms: &[Room],
    dates: &[ExamDate],
    config: &ExamConfig,
) -> ValidationResult {
    let mut errors = Vec::new();

    for (empty, what) in [
        (rooms.is_empty(), "exam rooms"),
        (invigilators.is_empty(), "invigilators"),
        (dates.is_empty(), "exam dates"),
        (config.slots.is_empty(), "exam sittings"),
    ] {
        if empty {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyPool,
                format!("No {what} available"),
            ));
        }
    }
    if config.students_per_room == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidValue,
            "students_per_room must be positive",
        ));
    }

    check_rooms(rooms, &mut errors);

    let mut names = HashSet::new();
    for i in invigilators {
        if !names.insert(i.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate invigilator: {}", i.name),
            ));
        }
    }
    let mut slots = HashSet::new();
    for slot in &config.slots {
        if !slots.insert(*slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate exam sitting: {slot:?}"),
            ));
        }
    }

    for exam in courses {
        if exam.code.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Exam for {}-{} has no code", exam.branch, exam.year),
            ));
        }
        if exam.branch.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                format!("Exam '{}' has no branch", exam.code),
            ));
        }
        if exam.year == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Exam '{}' has year 0", exam.code),
            ));
        }
        if exam.is_schedulable() && exam.students == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("Exam '{}' has no students", exam.code),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rooms(rooms: &[Room], errors: &mut Vec<ValidationError>) {
    let mut numbers = HashSet::new();
    for room in rooms {
        if room.number.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                "Room has no number",
            ));
        } else if !numbers.insert(room.number.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room number: {}", room.number),
            ));
        }
    }
}

/// An invariant broken by a finished schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Invariant category.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A faculty member (or invigilator) is booked twice at once.
    FacultyClash,
    /// A room is booked twice at once.
    RoomClash,
    /// A student group attends two sessions at once.
    GroupClash,
    /// Two sessions of one course share a day.
    RepeatedDay,
    /// A session occupies an elective window.
    ElectiveWindow,
    /// A session uses a slot outside the catalog.
    UnknownSlot,
    /// An intake sits two exams on one date.
    IntakeDateClash,
    /// Room, invigilator, and duty counts disagree with the student count.
    RoomCountMismatch,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Re-verifies every class timetable invariant.
///
/// Returns every violation found (empty when the timetable is sound).
pub fn check_timetable(
    timetable: &Timetable,
    catalog: &SlotCatalog,
    windows: &[ElectiveWindow],
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let sessions = &timetable.sessions;

    for (i, a) in sessions.iter().enumerate() {
        for b in &sessions[i + 1..] {
            if !a.overlaps(b) {
                continue;
            }
            let at = format!(
                "{} {} ({} / {})",
                a.day, a.time_label, a.course_code, b.course_code
            );
            if let Some(f) = a.faculty.iter().find(|f| b.faculty.contains(f)) {
                violations.push(Violation::new(
                    ViolationKind::FacultyClash,
                    format!("{f} double-booked on {at}"),
                ));
            }
            if a.room == b.room {
                violations.push(Violation::new(
                    ViolationKind::RoomClash,
                    format!("room {} double-booked on {at}", a.room),
                ));
            }
            if let Some(g) = a.groups.iter().find(|g| b.attended_by(g)) {
                violations.push(Violation::new(
                    ViolationKind::GroupClash,
                    format!("{g} double-booked on {at}"),
                ));
            }
        }
    }

    let mut days: HashMap<_, Vec<_>> = HashMap::new();
    for s in sessions
        .iter()
        .filter(|s| s.session_type.sessions_per_week() > 1)
    {
        let key = (&s.course_code, s.session_type, s.half, &s.groups);
        let seen = days.entry(key).or_default();
        if seen.contains(&s.day) {
            violations.push(Violation::new(
                ViolationKind::RepeatedDay,
                format!("{} ({}) repeats {}", s.course_code, s.half, s.day),
            ));
        }
        seen.push(s.day);
    }

    for s in sessions {
        for w in windows.iter().filter(|w| w.day == s.day) {
            let window = TimeSlot::new(w.start_minute, w.end_minute);
            if s.slots.iter().any(|slot| slot.overlaps(&window)) {
                violations.push(Violation::new(
                    ViolationKind::ElectiveWindow,
                    format!(
                        "{} on {} {} hits an elective window",
                        s.course_code, s.day, s.time_label
                    ),
                ));
            }
        }
        if s.slots.iter().any(|slot| !catalog.slots().contains(slot)) {
            violations.push(Violation::new(
                ViolationKind::UnknownSlot,
                format!("{} uses a slot outside the catalog", s.course_code),
            ));
        }
    }

    violations
}

/// Re-verifies every exam schedule invariant.
pub fn check_exam_schedule(schedule: &ExamSchedule, config: &ExamConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut intake_dates = HashSet::new();
    let mut sitting_rooms = HashSet::new();
    let mut sitting_invigilators = HashSet::new();

    for a in &schedule.assignments {
        if !intake_dates.insert((&a.branch, a.year, a.date)) {
            violations.push(Violation::new(
                ViolationKind::IntakeDateClash,
                format!("{}-{} sits two exams on {}", a.branch, a.year, a.date),
            ));
        }

        let needed = config.rooms_needed(a.students);
        if a.rooms.len() != needed
            || a.invigilators.len() != needed
            || a.duties.len() != needed
        {
            violations.push(Violation::new(
                ViolationKind::RoomCountMismatch,
                format!(
                    "{}: {} students need {} rooms, got {} rooms / {} invigilators / {} duties",
                    a.course_code,
                    a.students,
                    needed,
                    a.rooms.len(),
                    a.invigilators.len(),
                    a.duties.len()
                ),
            ));
        }

        for room in &a.rooms {
            if !sitting_rooms.insert((a.date, a.slot, room)) {
                violations.push(Violation::new(
                    ViolationKind::RoomClash,
                    format!("room {room} double-booked on {} {:?}", a.date, a.slot),
                ));
            }
        }
        for name in &a.invigilators {
            if !sitting_invigilators.insert((a.date, a.slot, name)) {
                violations.push(Violation::new(
                    ViolationKind::FacultyClash,
                    format!("{name} invigilates twice on {} {:?}", a.date, a.slot),
                ));
            }
        }
    }

    violations
}
