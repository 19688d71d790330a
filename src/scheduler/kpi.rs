//! Timetable quality metrics (KPIs).
//!
//! Computes indicators from a finished run and its inputs.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placement Rate | placed / (placed + unplaced) sessions |
//! | Sessions by Day | Placed sessions per weekday |
//! | Room Utilization | Teaching minutes / (catalog minutes × days × halves) |
//! | Exam Completion Rate | scheduled / (scheduled + unscheduled) exams |
//! | Duty Spread | Max - min duties over the invigilator pool |

use std::collections::{HashMap, HashSet};

use chrono::Weekday;

use crate::models::{ExamSchedule, Half, Invigilator, Room, SlotCatalog, Timetable};

/// Class timetable indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Sessions placed.
    pub placed: usize,
    /// Sessions left unplaced.
    pub unplaced: usize,
    /// Fraction of sessions placed (0.0..1.0).
    pub placement_rate: f64,
    /// Placed sessions per weekday.
    pub sessions_by_day: HashMap<Weekday, usize>,
    /// Per-room utilization (0.0..1.0).
    pub utilization_by_room: HashMap<String, f64>,
    /// Mean room utilization (0.0..1.0).
    pub avg_room_utilization: f64,
}

impl TimetableKpi {
    /// Computes KPIs from a timetable.
    ///
    /// # Arguments
    /// * `timetable` - The generated timetable.
    /// * `rooms` - The room pool (unused rooms count as 0.0).
    /// * `catalog` - The slot catalog the run used.
    /// * `days` - The teaching days the run used.
    pub fn calculate(
        timetable: &Timetable,
        rooms: &[Room],
        catalog: &SlotCatalog,
        days: &[Weekday],
    ) -> Self {
        let placed = timetable.session_count();
        let unplaced = timetable.unplaced_count();
        let placement_rate = if placed + unplaced == 0 {
            1.0
        } else {
            placed as f64 / (placed + unplaced) as f64
        };

        let mut sessions_by_day = HashMap::new();
        for session in &timetable.sessions {
            *sessions_by_day.entry(session.day).or_insert(0) += 1;
        }

        let capacity =
            catalog.minutes_per_day() as f64 * days.len() as f64 * Half::ALL.len() as f64;
        let mut minutes: HashMap<&str, u32> =
            rooms.iter().map(|r| (r.number.as_str(), 0)).collect();
        for session in &timetable.sessions {
            *minutes.entry(session.room.as_str()).or_insert(0) += session.duration_minutes();
        }
        let utilization_by_room: HashMap<String, f64> = minutes
            .into_iter()
            .map(|(room, used)| {
                let u = if capacity > 0.0 { used as f64 / capacity } else { 0.0 };
                (room.to_string(), u)
            })
            .collect();
        let avg_room_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        Self {
            placed,
            unplaced,
            placement_rate,
            sessions_by_day,
            utilization_by_room,
            avg_room_utilization,
        }
    }

    /// Busiest weekday, if any session was placed.
    pub fn busiest_day(&self) -> Option<Weekday> {
        self.sessions_by_day
            .iter()
            .max_by(|a, b| {
                a.1.cmp(b.1)
                    .then(b.0.num_days_from_monday().cmp(&a.0.num_days_from_monday()))
            })
            .map(|(day, _)| *day)
    }

    /// Whether the timetable meets a minimum placement rate.
    pub fn meets_threshold(&self, min_placement_rate: f64) -> bool {
        self.placement_rate >= min_placement_rate
    }
}

/// Exam schedule indicators.
#[derive(Debug, Clone)]
pub struct ExamKpi {
    /// Exams scheduled.
    pub scheduled: usize,
    /// Theory exams left unscheduled.
    pub unscheduled: usize,
    /// Fraction of theory exams scheduled (0.0..1.0).
    pub completion_rate: f64,
    /// Distinct dates holding at least one exam.
    pub dates_used: usize,
    /// Room allocations across all sittings.
    pub rooms_allocated: usize,
    /// Duties per invigilator (whole pool, zeros included).
    pub duties_by_invigilator: HashMap<String, usize>,
    /// Max - min duties over the pool.
    pub duty_spread: usize,
}

impl ExamKpi {
    /// Computes KPIs from an exam schedule and its invigilator pool.
    pub fn calculate(schedule: &ExamSchedule, invigilators: &[Invigilator]) -> Self {
        let scheduled = schedule.assignment_count();
        let unscheduled = schedule.unscheduled.len();
        let completion_rate = if scheduled + unscheduled == 0 {
            1.0
        } else {
            scheduled as f64 / (scheduled + unscheduled) as f64
        };

        let dates_used = schedule
            .assignments
            .iter()
            .map(|a| a.date)
            .collect::<HashSet<_>>()
            .len();
        let rooms_allocated = schedule.assignments.iter().map(|a| a.rooms.len()).sum();

        let mut duties_by_invigilator: HashMap<String, usize> =
            invigilators.iter().map(|i| (i.name.clone(), 0)).collect();
        for name in schedule.assignments.iter().flat_map(|a| a.invigilators.iter()) {
            *duties_by_invigilator.entry(name.clone()).or_insert(0) += 1;
        }
        let max = duties_by_invigilator.values().copied().max().unwrap_or(0);
        let min = duties_by_invigilator.values().copied().min().unwrap_or(0);

        Self {
            scheduled,
            unscheduled,
            completion_rate,
            dates_used,
            rooms_allocated,
            duties_by_invigilator,
            duty_spread: max - min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExamAssignment, ExamSlot, Session, SessionType, StudentGroup, TimeSlot, UnplacedSession,
    };
    use chrono::NaiveDate;

    fn session(day: Weekday, room: &str, slots: Vec<TimeSlot>) -> Session {
        Session {
            day,
            time_label: String::new(),
            slots,
            course_code: "CS101".into(),
            course_name: String::new(),
            session_label: "Lecture 1 of 2".into(),
            session_type: SessionType::Lecture,
            faculty: vec!["Dr. Rao".into()],
            room: room.into(),
            branch: "CSE".into(),
            year: 1,
            section: None,
            groups: vec![StudentGroup::new("CSE", 1)],
            half: Half::First,
            combined: false,
        }
    }

    #[test]
    fn test_timetable_kpi() {
        let mut t = Timetable::new();
        let lecture = vec![TimeSlot::hm(9, 0, 10, 0), TimeSlot::hm(10, 0, 10, 30)];
        t.add_session(session(Weekday::Mon, "C1", lecture));
        t.add_session(session(Weekday::Mon, "C1", vec![TimeSlot::hm(11, 15, 12, 15)]));
        t.add_session(session(Weekday::Wed, "C1", vec![TimeSlot::hm(14, 30, 15, 30)]));
        t.add_unplaced(UnplacedSession {
            course_code: "CS102".into(),
            session_label: "Lab".into(),
            session_type: SessionType::Lab,
            groups: vec![StudentGroup::new("CSE", 1)],
            half: Half::First,
            attempts: 500,
            reason: "no conflict-free placement".into(),
        });

        let rooms = vec![Room::classroom("C1"), Room::classroom("C2")];
        let days = [Weekday::Mon, Weekday::Wed];
        let kpi = TimetableKpi::calculate(&t, &rooms, &SlotCatalog::standard(), &days);

        assert_eq!(kpi.placed, 3);
        assert!((kpi.placement_rate - 0.75).abs() < 1e-9);
        assert_eq!(kpi.sessions_by_day[&Weekday::Mon], 2);
        assert_eq!(kpi.busiest_day(), Some(Weekday::Mon));
        // 210 minutes over 420 × 2 days × 2 halves
        assert!((kpi.utilization_by_room["C1"] - 210.0 / 1680.0).abs() < 1e-9);
        assert_eq!(kpi.utilization_by_room["C2"], 0.0);
        assert!(!kpi.meets_threshold(0.8));
    }

    #[test]
    fn test_empty_timetable_kpi() {
        let kpi = TimetableKpi::calculate(&Timetable::new(), &[], &SlotCatalog::standard(), &[]);
        assert_eq!(kpi.placement_rate, 1.0);
        assert_eq!(kpi.avg_room_utilization, 0.0);
        assert_eq!(kpi.busiest_day(), None);
    }

    #[test]
    fn test_exam_kpi() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let assignment = |code: &str, invigilators: Vec<&str>| ExamAssignment {
            date,
            display_date: "04-03-2024".into(),
            weekday: "Monday".into(),
            slot: ExamSlot::Forenoon,
            slot_label: String::new(),
            course_code: code.into(),
            course_name: String::new(),
            credits: 3,
            branch: "CSE".into(),
            year: 1,
            students: 30 * invigilators.len() as u32,
            rooms: (0..invigilators.len()).map(|i| format!("E{i}")).collect(),
            invigilators: invigilators.iter().map(|s| s.to_string()).collect(),
            duties: Vec::new(),
        };
        let mut s = ExamSchedule::new();
        s.assignments.push(assignment("CS101", vec!["A", "B"]));
        s.assignments.push(assignment("CS102", vec!["A"]));

        let pool = vec![Invigilator::new("A"), Invigilator::new("B"), Invigilator::new("C")];
        let kpi = ExamKpi::calculate(&s, &pool);
        assert_eq!(kpi.scheduled, 2);
        assert_eq!(kpi.completion_rate, 1.0);
        assert_eq!(kpi.dates_used, 1);
        assert_eq!(kpi.rooms_allocated, 3);
        assert_eq!(kpi.duties_by_invigilator["C"], 0);
        assert_eq!(kpi.duty_spread, 2);
    }
}
