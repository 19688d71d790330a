//! Exam scheduler.
//!
//! # Algorithm
//!
//! 1. Keep theory exams only; partition them by `(branch, year)` intake.
//! 2. Within an intake, order exams so the heaviest pick first
//!    ([`ExamOrdering`]).
//! 3. Each intake keeps a rolling cursor into the `(date, sitting)`
//!    sequence. For each exam, scan forward from the cursor (wrapping
//!    around once), skipping dates the intake already sits an exam on.
//! 4. At the first sitting with enough free rooms and an equal number of
//!    free invigilators, reserve them all at once, pair each room with
//!    one invigilator, mark the date consumed, and advance the cursor.
//! 5. Exams with no such sitting are reported as unscheduled.
//!
//! Invigilators are chosen with the exam's own faculty first (if on the
//! pool and free), then by fewest duties so far, then by name.
//!
//! Different intakes may share a sitting freely. Rooms and invigilators
//! are exclusive per sitting.
//!
//! # Complexity
//! O(e * d * s * (r + i)) where e=exams, d=dates, s=sittings per date,
//! r=rooms, i=invigilators.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use super::conflict::{Claim, ConflictIndex, Epoch};
use crate::config::{ExamConfig, ExamOrdering};
use crate::error::{Result, TimetableError};
use crate::models::{
    Diagnostic, ExamAssignment, ExamCourse, ExamDate, ExamSchedule, ExamSlot, Invigilator, Room,
    RoomDuty, StudentGroup, UnscheduledExam,
};
use crate::validation::validate_exam_input;

/// Lists the exam dates in `start..=end`, skipping the rest day.
///
/// # Errors
/// [`TimetableError::InvalidDateRange`] if `end` precedes `start` or no
/// date survives the rest-day filter.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_timetable::config::ExamConfig;
/// use u_timetable::scheduler::exam_dates;
///
/// // 2024-03-01 is a Friday; Sunday the 3rd is skipped
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let dates = exam_dates(start, end, &ExamConfig::default()).unwrap();
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates[2].display, "04-03-2024");
/// assert_eq!(dates[2].weekday, "Monday");
/// ```
pub fn exam_dates(start: NaiveDate, end: NaiveDate, config: &ExamConfig) -> Result<Vec<ExamDate>> {
    if end < start {
        return Err(TimetableError::InvalidDateRange {
            start,
            end,
            reason: "end date precedes start date".to_string(),
        });
    }

    let dates: Vec<ExamDate> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| d.weekday() != config.rest_day)
        .map(|date| ExamDate {
            date,
            display: date.format(&config.display_format).to_string(),
            weekday: date.format("%A").to_string(),
        })
        .collect();

    if dates.is_empty() {
        return Err(TimetableError::InvalidDateRange {
            start,
            end,
            reason: format!("no dates left after excluding {}", config.rest_day),
        });
    }
    Ok(dates)
}

/// Exam scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_timetable::config::ExamConfig;
/// use u_timetable::models::{ExamCourse, Invigilator, Room};
/// use u_timetable::scheduler::ExamScheduler;
///
/// let courses = vec![
///     ExamCourse::new("CS101", "CSE", 1, 55).with_credits(4),
///     ExamCourse::new("MA101", "CSE", 1, 20).with_credits(3),
/// ];
/// let invigilators = vec![Invigilator::new("Dr. Rao"), Invigilator::new("Dr. Sen")];
/// let rooms = vec![Room::classroom("E1"), Room::classroom("E2")];
/// let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
///
/// let schedule = ExamScheduler::new(ExamConfig::default())
///     .schedule_range(&courses, &invigilators, &rooms, start, end)
///     .unwrap();
/// assert!(schedule.is_complete());
/// // 55 students need two rooms, each with its own invigilator
/// assert_eq!(schedule.assignments[0].duties.len(), 2);
/// // One exam per intake per date
/// assert_ne!(schedule.assignments[0].date, schedule.assignments[1].date);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExamScheduler {
    config: ExamConfig,
}

/// Per-run bookkeeping.
struct ExamRun {
    index: ConflictIndex<NaiveDate, ExamSlot>,
    consumed: HashSet<(StudentGroup, NaiveDate)>,
    duties: HashMap<String, usize>,
    schedule: ExamSchedule,
}

impl ExamScheduler {
    /// Creates a scheduler.
    pub fn new(config: ExamConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// Schedules over the dates of `start..=end` (rest day excluded).
    pub fn schedule_range(
        &self,
        courses: &[ExamCourse],
        invigilators: &[Invigilator],
        rooms: &[Room],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ExamSchedule> {
        let dates = exam_dates(start, end, &self.config)?;
        self.schedule(courses, invigilators, rooms, &dates)
    }

    /// Schedules over an explicit list of dates.
    ///
    /// # Errors
    /// [`TimetableError::InvalidInput`] if the input fails validation.
    pub fn schedule(
        &self,
        courses: &[ExamCourse],
        invigilators: &[Invigilator],
        rooms: &[Room],
        dates: &[ExamDate],
    ) -> Result<ExamSchedule> {
        validate_exam_input(courses, invigilators, rooms, dates, &self.config)?;

        let groups = self.partition(courses);
        let mut run = ExamRun {
            index: ConflictIndex::new(),
            consumed: HashSet::new(),
            duties: HashMap::new(),
            schedule: ExamSchedule::new(),
        };

        for warning in self.shortage_warnings(&groups, invigilators, rooms, dates) {
            warn!(subject = %warning.subject, "{}", warning.message);
            run.schedule.warnings.push(warning);
        }

        info!(
            exams = groups.values().map(Vec::len).sum::<usize>(),
            intakes = groups.len(),
            dates = dates.len(),
            "generating exam schedule"
        );

        let pairs: Vec<(usize, ExamSlot)> = (0..dates.len())
            .flat_map(|d| self.config.slots.iter().map(move |s| (d, *s)))
            .collect();

        for (group, exams) in &groups {
            let mut cursor = 0;
            for exam in exams {
                cursor = self.place_exam(
                    &mut run,
                    group,
                    exam,
                    invigilators,
                    rooms,
                    dates,
                    &pairs,
                    cursor,
                );
            }
        }

        let schedule = run.schedule;
        info!(
            scheduled = schedule.assignment_count(),
            unscheduled = schedule.unscheduled.len(),
            "exam schedule complete"
        );
        Ok(schedule)
    }

    /// Theory exams by intake, each intake in priority order.
    fn partition<'a>(
        &self,
        courses: &'a [ExamCourse],
    ) -> BTreeMap<StudentGroup, Vec<&'a ExamCourse>> {
        let mut groups: BTreeMap<StudentGroup, Vec<&ExamCourse>> = BTreeMap::new();
        for course in courses.iter().filter(|c| c.is_schedulable()) {
            groups.entry(course.group()).or_default().push(course);
        }
        for exams in groups.values_mut() {
            match self.config.ordering {
                ExamOrdering::CreditsThenStudents => exams.sort_by(|a, b| {
                    b.credits
                        .cmp(&a.credits)
                        .then(b.students.cmp(&a.students))
                        .then(a.code.cmp(&b.code))
                }),
                ExamOrdering::StudentsOnly => {
                    exams.sort_by(|a, b| b.students.cmp(&a.students).then(a.code.cmp(&b.code)))
                }
            }
        }
        groups
    }

    /// Places one exam, returning the intake's next cursor.
    #[allow(clippy::too_many_arguments)]
    fn place_exam(
        &self,
        run: &mut ExamRun,
        group: &StudentGroup,
        exam: &ExamCourse,
        invigilators: &[Invigilator],
        rooms: &[Room],
        dates: &[ExamDate],
        pairs: &[(usize, ExamSlot)],
        cursor: usize,
    ) -> usize {
        let needed = self.config.rooms_needed(exam.students);
        let mut attempts = 0;
        let mut reason = "every date already holds an exam for this intake".to_string();

        for step in 0..pairs.len() {
            let pos = (cursor + step) % pairs.len();
            let (d, slot) = pairs[pos];
            let date = dates[d].date;
            attempts += 1;

            if run.consumed.contains(&(group.clone(), date)) {
                continue;
            }

            let free_rooms: Vec<String> = rooms
                .iter()
                .filter(|r| !run.index.room_busy(&r.number, date, slot, Epoch::ExamPeriod))
                .take(needed)
                .map(|r| r.number.clone())
                .collect();
            if free_rooms.len() < needed {
                reason = format!("no sitting with {needed} free room(s)");
                continue;
            }

            let chosen = pick_invigilators(run, exam, invigilators, date, slot, needed);
            if chosen.len() < needed {
                reason = format!("no sitting with {needed} free invigilator(s)");
                continue;
            }

            let claim = Claim {
                faculty: &chosen,
                rooms: &free_rooms,
                groups: std::slice::from_ref(group),
                day: date,
                slots: std::slice::from_ref(&slot),
                epoch: Epoch::ExamPeriod,
            };
            if !run.index.try_reserve(&claim) {
                continue;
            }

            run.consumed.insert((group.clone(), date));
            for name in &chosen {
                *run.duties.entry(name.clone()).or_insert(0) += 1;
            }
            debug!(
                course = %exam.code,
                intake = %group,
                date = %date,
                slot = ?slot,
                rooms = needed,
                attempts,
                "exam placed"
            );

            let duties = free_rooms
                .iter()
                .zip(&chosen)
                .map(|(room, invigilator)| RoomDuty {
                    room: room.clone(),
                    invigilator: invigilator.clone(),
                })
                .collect();
            run.schedule.assignments.push(ExamAssignment {
                date,
                display_date: dates[d].display.clone(),
                weekday: dates[d].weekday.clone(),
                slot,
                slot_label: self.config.slot_label(slot).to_string(),
                course_code: exam.code.clone(),
                course_name: exam.name.clone(),
                credits: exam.credits,
                branch: exam.branch.clone(),
                year: exam.year,
                students: exam.students,
                rooms: free_rooms,
                invigilators: chosen,
                duties,
            });
            return pos + 1;
        }

        warn!(course = %exam.code, intake = %group, attempts, "exam unscheduled: {}", reason);
        run.schedule.unscheduled.push(UnscheduledExam {
            course_code: exam.code.clone(),
            branch: exam.branch.clone(),
            year: exam.year,
            students: exam.students,
            rooms_needed: needed,
            attempts,
            reason,
        });
        cursor
    }

    fn shortage_warnings(
        &self,
        groups: &BTreeMap<StudentGroup, Vec<&ExamCourse>>,
        invigilators: &[Invigilator],
        rooms: &[Room],
        dates: &[ExamDate],
    ) -> Vec<Diagnostic> {
        let mut warnings = Vec::new();
        for (group, exams) in groups {
            if exams.len() > dates.len() {
                warnings.push(Diagnostic::resource_shortage(
                    group.to_string(),
                    format!(
                        "{} exams but only {} exam dates (one exam per date per intake)",
                        exams.len(),
                        dates.len()
                    ),
                ));
            }
            for exam in exams {
                let needed = self.config.rooms_needed(exam.students);
                if needed > rooms.len() {
                    warnings.push(Diagnostic::resource_shortage(
                        exam.code.clone(),
                        format!("needs {needed} rooms but only {} exist", rooms.len()),
                    ));
                }
                if needed > invigilators.len() {
                    warnings.push(Diagnostic::resource_shortage(
                        exam.code.clone(),
                        format!(
                            "needs {needed} invigilators but only {} exist",
                            invigilators.len()
                        ),
                    ));
                }
            }
        }
        warnings
    }
}

/// Free invigilators for a sitting: own faculty first, then least loaded.
fn pick_invigilators(
    run: &ExamRun,
    exam: &ExamCourse,
    invigilators: &[Invigilator],
    date: NaiveDate,
    slot: ExamSlot,
    needed: usize,
) -> Vec<String> {
    let mut free: Vec<&str> = invigilators
        .iter()
        .map(|i| i.name.as_str())
        .filter(|name| !run.index.faculty_busy(name, date, slot, Epoch::ExamPeriod))
        .collect();
    free.sort_by(|a, b| {
        let own_a = exam.faculty.as_deref() == Some(*a);
        let own_b = exam.faculty.as_deref() == Some(*b);
        let load_a = run.duties.get(*a).copied().unwrap_or(0);
        let load_b = run.duties.get(*b).copied().unwrap_or(0);
        own_b.cmp(&own_a).then(load_a.cmp(&load_b)).then(a.cmp(b))
    });
    free.into_iter().take(needed).map(str::to_string).collect()
}

/// Schedules exams over `start..=end` with the given configuration.
pub fn generate_exam_schedule(
    courses: &[ExamCourse],
    invigilators: &[Invigilator],
    rooms: &[Room],
    start: NaiveDate,
    end: NaiveDate,
    config: &ExamConfig,
) -> Result<ExamSchedule> {
    ExamScheduler::new(config.clone()).schedule_range(courses, invigilators, rooms, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExamType;
    use crate::validation::check_exam_schedule;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pool(prefix: &str, n: usize) -> Vec<Invigilator> {
        (0..n).map(|i| Invigilator::new(format!("{prefix}{i}"))).collect()
    }

    fn rooms(n: usize) -> Vec<Room> {
        (0..n).map(|i| Room::classroom(format!("E{i}"))).collect()
    }

    #[test]
    fn test_exam_dates_skip_rest_day() {
        // 2024-03-03 is a Sunday
        let cfg = ExamConfig::default();
        let dates = exam_dates(date(2024, 3, 1), date(2024, 3, 10), &cfg).unwrap();
        assert_eq!(dates.len(), 8);
        assert!(dates.iter().all(|d| d.date.weekday() != Weekday::Sun));
        assert!(dates.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(dates[0].display, "01-03-2024");
        assert_eq!(dates[0].weekday, "Friday");
    }

    #[test]
    fn test_exam_dates_invalid_ranges() {
        let cfg = ExamConfig::default();
        assert!(matches!(
            exam_dates(date(2024, 3, 10), date(2024, 3, 1), &cfg),
            Err(TimetableError::InvalidDateRange { .. })
        ));
        // A lone Sunday
        assert!(exam_dates(date(2024, 3, 3), date(2024, 3, 3), &cfg).is_err());
        // Rest day moved: the Sunday is usable
        let sat = cfg.with_rest_day(Weekday::Sat);
        assert_eq!(exam_dates(date(2024, 3, 3), date(2024, 3, 3), &sat).unwrap().len(), 1);
    }

    #[test]
    fn test_rooms_and_invigilators_paired() {
        let courses = vec![ExamCourse::new("CS101", "CSE", 1, 95).with_credits(4)];
        let s = ExamScheduler::default()
            .schedule_range(&courses, &pool("I", 5), &rooms(5), date(2024, 3, 4), date(2024, 3, 5))
            .unwrap();

        let a = &s.assignments[0];
        assert_eq!(a.rooms.len(), 4);
        assert_eq!(a.invigilators.len(), 4);
        assert_eq!(a.duties.len(), 4);
        assert_eq!(a.slot, ExamSlot::Forenoon);
        assert_eq!(a.slot_label, "Forenoon (09:30-12:30)");
        assert!(check_exam_schedule(&s, &ExamConfig::default()).is_empty());
    }

    #[test]
    fn test_own_faculty_invigilates_first() {
        let courses = vec![ExamCourse::new("CS101", "CSE", 1, 20).with_faculty("I2")];
        let s = ExamScheduler::default()
            .schedule_range(&courses, &pool("I", 3), &rooms(1), date(2024, 3, 4), date(2024, 3, 4))
            .unwrap();
        assert_eq!(s.assignments[0].invigilators, vec!["I2".to_string()]);
    }

    #[test]
    fn test_duties_balanced() {
        // Four intakes, two rooms: two intakes per sitting
        let courses: Vec<ExamCourse> = (1..=4)
            .map(|y| ExamCourse::new(format!("C{y}"), "CSE", y, 10))
            .collect();
        let s = ExamScheduler::default()
            .schedule_range(&courses, &pool("I", 2), &rooms(2), date(2024, 3, 4), date(2024, 3, 5))
            .unwrap();
        assert!(s.is_complete());
        assert_eq!(s.duty_count("I0"), 2);
        assert_eq!(s.duty_count("I1"), 2);
    }

    #[test]
    fn test_ordering_heaviest_first() {
        let courses = vec![
            ExamCourse::new("LIGHT", "CSE", 1, 80).with_credits(2),
            ExamCourse::new("HEAVY", "CSE", 1, 20).with_credits(4),
        ];
        let by_credits = ExamScheduler::default()
            .schedule_range(&courses, &pool("I", 3), &rooms(3), date(2024, 3, 4), date(2024, 3, 6))
            .unwrap();
        assert_eq!(by_credits.assignments[0].course_code, "HEAVY");

        let cfg = ExamConfig::default().with_ordering(ExamOrdering::StudentsOnly);
        let by_students = ExamScheduler::new(cfg)
            .schedule_range(&courses, &pool("I", 3), &rooms(3), date(2024, 3, 4), date(2024, 3, 6))
            .unwrap();
        assert_eq!(by_students.assignments[0].course_code, "LIGHT");
    }

    #[test]
    fn test_practicals_are_skipped() {
        let courses = vec![
            ExamCourse::new("CS101", "CSE", 1, 20),
            ExamCourse::new("CS101L", "CSE", 1, 20).with_type(ExamType::Practical),
        ];
        let s = ExamScheduler::default()
            .schedule_range(&courses, &pool("I", 1), &rooms(1), date(2024, 3, 4), date(2024, 3, 4))
            .unwrap();
        assert_eq!(s.assignment_count(), 1);
        assert!(s.is_complete());
    }

    #[test]
    fn test_too_many_exams_for_dates() {
        let courses: Vec<ExamCourse> = (0..3)
            .map(|i| ExamCourse::new(format!("C{i}"), "CSE", 1, 10))
            .collect();
        let s = ExamScheduler::default()
            .schedule_range(&courses, &pool("I", 1), &rooms(1), date(2024, 3, 4), date(2024, 3, 5))
            .unwrap();
        assert_eq!(s.assignment_count(), 2);
        assert_eq!(s.unscheduled.len(), 1);
        assert_eq!(s.unscheduled[0].attempts, 4);
        assert!(s.warnings.iter().any(|w| w.is_shortage()));
    }

    #[test]
    fn test_cursor_wraps_to_skipped_dates() {
        // One sitting per date. B1 needs both rooms, so it skips the first
        // date (A1 holds a room) and the cursor runs off the end; B2 then
        // wraps back to the first date.
        let courses = vec![
            ExamCourse::new("A1", "AAA", 1, 30),
            ExamCourse::new("B1", "BBB", 1, 60).with_credits(4),
            ExamCourse::new("B2", "BBB", 1, 10).with_credits(1),
        ];
        let cfg = ExamConfig::default().with_slots(vec![ExamSlot::Forenoon]);
        let dates = exam_dates(date(2024, 3, 4), date(2024, 3, 5), &cfg).unwrap();
        let s = ExamScheduler::new(cfg.clone())
            .schedule(&courses, &pool("I", 2), &rooms(2), &dates)
            .unwrap();

        assert!(s.is_complete());
        let find = |code: &str| s.assignments.iter().find(|a| a.course_code == code).unwrap();
        assert_eq!(find("A1").date, date(2024, 3, 4));
        assert_eq!(find("B1").date, date(2024, 3, 5));
        assert_eq!(find("B2").date, date(2024, 3, 4));
        assert!(check_exam_schedule(&s, &cfg).is_empty());
    }

    #[test]
    fn test_empty_pools_rejected() {
        let courses = vec![ExamCourse::new("CS101", "CSE", 1, 20)];
        let sched = ExamScheduler::default();
        assert!(sched
            .schedule_range(&courses, &[], &rooms(1), date(2024, 3, 4), date(2024, 3, 4))
            .is_err());
        assert!(sched
            .schedule_range(&courses, &pool("I", 1), &[], date(2024, 3, 4), date(2024, 3, 4))
            .is_err());
    }
}
