//! Class timetable scheduler.
//!
//! # Algorithm
//!
//! For each semester half (`First`, then `Second`), with one conflict
//! index shared by both halves but keyed by epoch:
//!
//! 1. Select the half's courses ([`FullSemesterPolicy`]).
//! 2. Place combined courses once each, against every listed section,
//!    in the largest eligible rooms.
//! 3. Place labs, cohort by cohort. Labs are the most constrained
//!    (120 minutes, lab rooms only), so they go first, trying three
//!    strategies of decreasing strictness:
//!    exact 120-minute runs, any 2-3 slot run inside a block, any two
//!    catalog-adjacent slots.
//! 4. Place lectures, then tutorials, cohort by cohort.
//!
//! Every session goes through [`place_session`]: bounded retries over
//! `days × combinations × rooms`, drawn by the configured sampler. The
//! sessions of one multi-session course land on pairwise distinct days.
//! Sessions that exhaust their budget are reported, not fatal.
//!
//! Elective windows are seeded into the conflict index before any
//! placement, so no session can occupy them.
//!
//! # Complexity
//! O(s * a) reservation checks, where s=sessions and a=attempt budget.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Weekday;
use tracing::{debug, info, warn};

use super::conflict::{ConflictIndex, Epoch};
use super::matcher::DurationMatcher;
use super::placement::{place_session, PlacementOutcome, PlacementRequest};
use super::sampler::{CandidateSampler, RandomSampler};
use crate::config::{FullSemesterPolicy, TimetableConfig};
use crate::error::Result;
use crate::models::{
    largest_room, Course, Diagnostic, Faculty, Half, Room, Session, SessionType, SlotCatalog,
    SlotCombination, SlotId, StudentGroup, Timetable, UnplacedSession,
};
use crate::validation::validate_class_input;

/// Class timetable scheduler.
///
/// # Example
///
/// ```
/// use u_timetable::config::TimetableConfig;
/// use u_timetable::models::{Course, Faculty, Room, SessionType};
/// use u_timetable::scheduler::ClassScheduler;
///
/// let courses = vec![
///     Course::new("CS101", SessionType::Lecture, "CSE", 1)
///         .with_section("A")
///         .with_faculty("Dr. Rao")
///         .with_credits(3),
/// ];
/// let faculty = vec![Faculty::new("Dr. Rao")];
/// let rooms = vec![Room::classroom("C-101").with_capacity(60)];
///
/// let mut scheduler = ClassScheduler::new(TimetableConfig::new().with_seed(7));
/// let timetable = scheduler.schedule(&courses, &faculty, &rooms).unwrap();
/// // Two lectures in each half
/// assert_eq!(timetable.session_count(), 4);
/// assert!(timetable.is_complete());
/// ```
#[derive(Debug)]
pub struct ClassScheduler {
    config: TimetableConfig,
    catalog: SlotCatalog,
    sampler: Box<dyn CandidateSampler>,
}

/// Mutable state of one run.
struct RunState {
    index: ConflictIndex<Weekday, SlotId>,
    matcher: DurationMatcher,
    timetable: Timetable,
    /// Days taken by any session type of a course, per attending groups and half.
    course_days: HashMap<(String, Vec<StudentGroup>, Half), Vec<Weekday>>,
}

impl ClassScheduler {
    /// Creates a scheduler over the standard slot catalog.
    ///
    /// Uses a random sampler, seeded from `config.seed` if set.
    pub fn new(config: TimetableConfig) -> Self {
        let sampler = RandomSampler::with_optional_seed(config.seed);
        Self {
            config,
            catalog: SlotCatalog::standard(),
            sampler: Box::new(sampler),
        }
    }

    /// Replaces the slot catalog.
    pub fn with_catalog(mut self, catalog: SlotCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replaces the candidate sampler.
    pub fn with_sampler<S: CandidateSampler + 'static>(mut self, sampler: S) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    /// The active slot catalog.
    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Builds the timetable for both semester halves.
    ///
    /// # Errors
    /// [`TimetableError::InvalidInput`](crate::error::TimetableError::InvalidInput)
    /// if the input fails validation. Nothing is placed in that case.
    pub fn schedule(
        &mut self,
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
    ) -> Result<Timetable> {
        validate_class_input(courses, faculty, rooms)?;

        let mut state = RunState {
            index: ConflictIndex::new(),
            matcher: DurationMatcher::new(self.catalog.clone(), self.config.tolerance_minutes),
            timetable: Timetable::new(),
            course_days: HashMap::new(),
        };

        for warning in roster_warnings(courses, faculty) {
            state.timetable.add_warning(warning);
        }
        for warning in self.shortage_warnings(courses, rooms) {
            warn!(subject = %warning.subject, "{}", warning.message);
            state.timetable.add_warning(warning);
        }

        self.seed_elective_windows(&mut state.index);

        info!(
            courses = courses.len(),
            rooms = rooms.len(),
            sampler = self.sampler.name(),
            "generating class timetable"
        );

        for half in Half::ALL {
            self.schedule_half(&mut state, courses, rooms, half);
        }

        let timetable = state.timetable;
        info!(
            placed = timetable.session_count(),
            unplaced = timetable.unplaced_count(),
            warnings = timetable.warnings.len(),
            "class timetable complete"
        );
        Ok(timetable)
    }

    fn seed_elective_windows(&self, index: &mut ConflictIndex<Weekday, SlotId>) {
        for window in &self.config.elective_windows {
            if !self.config.days.contains(&window.day) {
                continue;
            }
            for slot in window.reserved_slots(&self.catalog) {
                for half in Half::ALL {
                    index.reserve_window(window.day, slot, half.into());
                }
            }
        }
    }

    fn schedule_half(
        &mut self,
        state: &mut RunState,
        courses: &[Course],
        rooms: &[Room],
        half: Half,
    ) {
        let policy: FullSemesterPolicy = self.config.full_semester_policy;
        let selected: Vec<&Course> = courses.iter().filter(|c| policy.includes(c, half)).collect();
        debug!(half = %half, courses = selected.len(), "semester half selected");

        // Combined sections, once per distinct joint offering
        let mut seen = HashSet::new();
        for course in selected.iter().filter(|c| c.is_combined()) {
            let groups = course.groups();
            let key = (course.code.clone(), course.session_type, groups.clone());
            if !seen.insert(key) {
                continue;
            }
            let room_pool = self.combined_rooms(state, course, rooms);
            self.place_course(state, course, half, &room_pool, &groups);
        }

        // Natural cohorts, in stable order
        let mut cohorts: BTreeMap<StudentGroup, Vec<&Course>> = BTreeMap::new();
        for course in selected.iter().filter(|c| !c.is_combined()) {
            cohorts.entry(course.cohort()).or_default().push(*course);
        }
        for list in cohorts.values_mut() {
            list.sort_by(|a, b| a.code.cmp(&b.code));
        }

        for (cohort, list) in &cohorts {
            let groups = std::slice::from_ref(cohort);
            for course in list.iter().filter(|c| c.session_type == SessionType::Lab) {
                let room_pool = rooms_of_kind(rooms, course.session_type);
                self.place_course(state, course, half, &room_pool, groups);
            }
        }

        for (cohort, list) in &cohorts {
            let groups = std::slice::from_ref(cohort);
            for session_type in [SessionType::Lecture, SessionType::Tutorial] {
                for course in list.iter().filter(|c| c.session_type == session_type) {
                    let room_pool = rooms_of_kind(rooms, course.session_type);
                    self.place_course(state, course, half, &room_pool, groups);
                }
            }
        }
    }

    /// Large rooms of the right kind, largest first; otherwise the
    /// globally largest room with a warning.
    fn combined_rooms(&self, state: &mut RunState, course: &Course, rooms: &[Room]) -> Vec<String> {
        let kind = course.session_type.room_kind();
        let mut large: Vec<&Room> = rooms
            .iter()
            .filter(|r| r.accepts(kind) && r.capacity >= self.config.large_room_capacity)
            .collect();
        large.sort_by(|a, b| b.capacity.cmp(&a.capacity));
        if !large.is_empty() {
            return large.into_iter().map(|r| r.number.clone()).collect();
        }

        match largest_room(rooms) {
            Some(room) => {
                let message = format!(
                    "no {:?} room holds {} seats; using largest room {} ({} seats)",
                    kind, self.config.large_room_capacity, room.number, room.capacity
                );
                warn!(course = %course.code, "{}", message);
                state
                    .timetable
                    .add_warning(Diagnostic::fallback_room(course.code.clone(), message));
                vec![room.number.clone()]
            }
            None => Vec::new(),
        }
    }

    /// Slot-run strategies for a session type, strictest first.
    fn strategies(
        &self,
        state: &mut RunState,
        session_type: SessionType,
    ) -> Vec<Vec<SlotCombination>> {
        let exact = state
            .matcher
            .combinations_for(session_type.duration_minutes())
            .to_vec();
        match session_type {
            SessionType::Lab => vec![
                exact,
                self.catalog.runs_within_blocks(2, 3),
                self.catalog.adjacent_pairs(),
            ],
            SessionType::Lecture | SessionType::Tutorial => vec![exact],
        }
    }

    fn place_course(
        &mut self,
        state: &mut RunState,
        course: &Course,
        half: Half,
        room_pool: &[String],
        groups: &[StudentGroup],
    ) {
        let strategies = self.strategies(state, course.session_type);
        let sessions = course.session_type.sessions_per_week();
        let key = (course.code.clone(), groups.to_vec(), half);
        let mut own_days: Vec<Weekday> = Vec::new();

        for i in 0..sessions {
            // Prefer days the course has not met on yet, then any day this
            // course record has not used
            let course_days = state.course_days.get(&key).cloned().unwrap_or_default();
            let mut pools: Vec<Vec<Weekday>> = Vec::with_capacity(2);
            for taken in [&course_days, &own_days] {
                let pool: Vec<Weekday> = self
                    .config
                    .days
                    .iter()
                    .copied()
                    .filter(|d| !taken.contains(d))
                    .collect();
                if !pools.contains(&pool) {
                    pools.push(pool);
                }
            }

            let mut attempts = 0;
            let mut last_reason = String::new();
            let mut placed = None;

            'pools: for days in &pools {
                for (level, combinations) in strategies.iter().enumerate() {
                    let request = PlacementRequest {
                        faculty: &course.faculty,
                        groups,
                        days,
                        combinations,
                        rooms: room_pool,
                        epoch: Epoch::from(half),
                        max_attempts: self.config.max_attempts,
                    };
                    match place_session(&mut state.index, self.sampler.as_mut(), &request) {
                        PlacementOutcome::Placed {
                            placement,
                            attempts: spent,
                        } => {
                            attempts += spent;
                            placed = Some(placement);
                            break 'pools;
                        }
                        PlacementOutcome::Unplaced {
                            attempts: spent,
                            reason,
                        } => {
                            attempts += spent;
                            if level + 1 < strategies.len() {
                                debug!(
                                    course = %course.code,
                                    strategy = level + 1,
                                    "{}; relaxing slot strategy",
                                    reason
                                );
                            }
                            last_reason = reason;
                        }
                    }
                }
            }

            let label = course.session_label(i);
            match placed {
                Some(placement) => {
                    own_days.push(placement.day);
                    state
                        .course_days
                        .entry(key.clone())
                        .or_default()
                        .push(placement.day);
                    debug!(
                        course = %course.code,
                        session = %label,
                        day = %placement.day,
                        time = %placement.combination.label(),
                        room = %placement.room,
                        attempts,
                        "session placed"
                    );
                    let session = Session {
                        day: placement.day,
                        slots: placement
                            .combination
                            .slots
                            .iter()
                            .filter_map(|id| self.catalog.get(*id).copied())
                            .collect(),
                        time_label: placement.combination.label(),
                        course_code: course.code.clone(),
                        course_name: course.name.clone(),
                        session_label: label,
                        session_type: course.session_type,
                        faculty: course.faculty.clone(),
                        room: placement.room,
                        branch: course.branch.clone(),
                        year: course.year,
                        section: if course.is_combined() {
                            None
                        } else {
                            course.section.clone()
                        },
                        groups: groups.to_vec(),
                        half,
                        combined: course.is_combined(),
                    };
                    state.timetable.add_session(session);
                }
                None => {
                    warn!(
                        course = %course.code,
                        session = %label,
                        half = %half,
                        attempts,
                        "session unplaced: {}",
                        last_reason
                    );
                    state.timetable.add_unplaced(UnplacedSession {
                        course_code: course.code.clone(),
                        session_label: label,
                        session_type: course.session_type,
                        groups: groups.to_vec(),
                        half,
                        attempts,
                        reason: last_reason,
                    });
                }
            }
        }
    }

    /// Structural shortages detectable before placement.
    fn shortage_warnings(&self, courses: &[Course], rooms: &[Room]) -> Vec<Diagnostic> {
        let mut warnings = Vec::new();

        for session_type in [SessionType::Lab, SessionType::Lecture] {
            let kind = session_type.room_kind();
            let needed = courses
                .iter()
                .filter(|c| c.session_type.room_kind() == kind)
                .count();
            if needed > 0 && !rooms.iter().any(|r| r.accepts(kind)) {
                warnings.push(Diagnostic::resource_shortage(
                    format!("{kind:?}"),
                    format!("{needed} course(s) need a {kind:?} room but none exist"),
                ));
            }
        }

        if self.config.days.len() < SessionType::Lecture.sessions_per_week()
            && courses.iter().any(|c| c.session_type == SessionType::Lecture)
        {
            warnings.push(Diagnostic::resource_shortage(
                "days",
                format!(
                    "lectures need {} distinct days but only {} are configured",
                    SessionType::Lecture.sessions_per_week(),
                    self.config.days.len()
                ),
            ));
        }

        let weekly = self.weekly_minutes();
        for half in Half::ALL {
            let mut cohort_load: BTreeMap<StudentGroup, u32> = BTreeMap::new();
            let mut faculty_load: BTreeMap<&str, u32> = BTreeMap::new();
            let mut seen = HashSet::new();
            for course in courses
                .iter()
                .filter(|c| self.config.full_semester_policy.includes(c, half))
            {
                let groups = course.groups();
                if course.is_combined()
                    && !seen.insert((course.code.clone(), course.session_type, groups.clone()))
                {
                    continue;
                }
                let kind = course.session_type;
                let minutes = kind.duration_minutes() * kind.sessions_per_week() as u32;
                for group in groups {
                    *cohort_load.entry(group).or_insert(0) += minutes;
                }
                for name in &course.faculty {
                    *faculty_load.entry(name.as_str()).or_insert(0) += minutes;
                }
            }

            for (group, minutes) in cohort_load.into_iter().filter(|(_, m)| *m > weekly) {
                warnings.push(Diagnostic::resource_shortage(
                    group.to_string(),
                    format!("{half}: {minutes} teaching minutes exceed {weekly} available"),
                ));
            }
            for (name, minutes) in faculty_load.into_iter().filter(|(_, m)| *m > weekly) {
                warnings.push(Diagnostic::resource_shortage(
                    name,
                    format!("{half}: {minutes} teaching minutes exceed {weekly} available"),
                ));
            }
        }

        warnings
    }

    /// Usable minutes per week outside elective windows.
    fn weekly_minutes(&self) -> u32 {
        let per_day = self.catalog.minutes_per_day() * self.config.days.len() as u32;
        let reserved: u32 = self
            .config
            .elective_windows
            .iter()
            .filter(|w| self.config.days.contains(&w.day))
            .flat_map(|w| w.reserved_slots(&self.catalog))
            .filter_map(|id| self.catalog.get(id))
            .map(|s| s.duration_minutes())
            .sum();
        per_day.saturating_sub(reserved)
    }
}

/// Builds the class timetable with a config-seeded random sampler.
pub fn generate_class_timetable(
    courses: &[Course],
    faculty: &[Faculty],
    rooms: &[Room],
    config: &TimetableConfig,
) -> Result<Timetable> {
    ClassScheduler::new(config.clone()).schedule(courses, faculty, rooms)
}

fn rooms_of_kind(rooms: &[Room], session_type: SessionType) -> Vec<String> {
    let kind = session_type.room_kind();
    rooms
        .iter()
        .filter(|r| r.accepts(kind))
        .map(|r| r.number.clone())
        .collect()
}

fn roster_warnings(courses: &[Course], faculty: &[Faculty]) -> Vec<Diagnostic> {
    let roster: HashSet<&str> = faculty.iter().map(|f| f.name.as_str()).collect();
    let mut reported: HashSet<&str> = HashSet::new();
    let mut warnings = Vec::new();
    for course in courses {
        for name in &course.faculty {
            if !roster.contains(name.as_str()) && reported.insert(name.as_str()) {
                warnings.push(Diagnostic::unknown_faculty(
                    course.code.clone(),
                    format!("faculty '{name}' is not on the roster"),
                ));
            }
        }
    }
    warnings
}
