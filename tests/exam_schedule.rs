use std::collections::HashSet;

use chrono::NaiveDate;
use u_timetable::config::ExamConfig;
use u_timetable::models::{ExamCourse, ExamSchedule, ExamSlot, ExamType, Invigilator, Room};
use u_timetable::scheduler::{exam_dates, ExamKpi, ExamScheduler};
use u_timetable::validation::check_exam_schedule;
use u_timetable::{generate_exam_schedule, TimetableError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Mon 4 to Wed 20 March 2024: 15 dates once both Sundays are dropped.
fn fifteen_dates() -> (NaiveDate, NaiveDate) {
    (date(2024, 3, 4), date(2024, 3, 20))
}

#[test]
fn test_fifteen_dates_in_range() {
    let (start, end) = fifteen_dates();
    let dates = exam_dates(start, end, &ExamConfig::default()).unwrap();
    assert_eq!(dates.len(), 15);
}

#[test]
fn test_single_intake_one_exam_per_date() {
    let courses: Vec<ExamCourse> = (0..40)
        .map(|i| ExamCourse::new(format!("CS{i:03}"), "CSE", 1, 25).with_credits(3))
        .collect();
    let invigilators = vec![Invigilator::new("Dr. Rao")];
    let rooms = vec![Room::classroom("E1").with_capacity(30)];
    let (start, end) = fifteen_dates();
    let config = ExamConfig::default();

    let s = generate_exam_schedule(&courses, &invigilators, &rooms, start, end, &config).unwrap();

    // One exam per intake per date caps the intake at 15 sittings
    assert_eq!(s.assignment_count(), 15);
    assert_eq!(s.unscheduled.len(), 25);
    let dates: HashSet<NaiveDate> = s.assignments.iter().map(|a| a.date).collect();
    assert_eq!(dates.len(), 15);
    assert!(s.warnings.iter().any(|w| w.is_shortage() && w.subject == "CSE-1"));
    assert!(check_exam_schedule(&s, &config).is_empty());
}

#[test]
fn test_two_intakes_fill_every_sitting() {
    let mut courses = Vec::new();
    for branch in ["CSE", "ECE"] {
        for i in 0..15 {
            courses.push(ExamCourse::new(format!("{branch}{i:02}"), branch, 1, 30));
        }
    }
    let invigilators = vec![Invigilator::new("Dr. Rao")];
    let rooms = vec![Room::classroom("E1")];
    let (start, end) = fifteen_dates();
    let config = ExamConfig::default();

    let s = generate_exam_schedule(&courses, &invigilators, &rooms, start, end, &config).unwrap();

    assert!(s.is_complete());
    assert_eq!(s.assignment_count(), 30);
    let sittings: HashSet<(NaiveDate, ExamSlot)> =
        s.assignments.iter().map(|a| (a.date, a.slot)).collect();
    assert_eq!(sittings.len(), 30);
    assert_eq!(s.duty_count("Dr. Rao"), 30);
    assert!(check_exam_schedule(&s, &config).is_empty());
}

#[test]
fn test_large_exam_gets_paired_rooms() {
    let courses = vec![
        ExamCourse::new("MA101", "CSE", 1, 125)
            .with_credits(4)
            .with_faculty("Dr. Sen"),
        ExamCourse::new("MA101L", "CSE", 1, 125).with_type(ExamType::Practical),
    ];
    let invigilators: Vec<Invigilator> = ["Dr. Rao", "Dr. Sen", "Dr. Iyer", "Dr. Das", "Dr. Roy"]
        .into_iter()
        .map(Invigilator::new)
        .collect();
    let rooms: Vec<Room> = (1..=5).map(|i| Room::classroom(format!("E{i}"))).collect();
    let config = ExamConfig::default().with_students_per_room(30);

    let s = ExamScheduler::new(config.clone())
        .schedule_range(&courses, &invigilators, &rooms, date(2024, 3, 4), date(2024, 3, 4))
        .unwrap();

    assert_eq!(s.assignment_count(), 1);
    let a = &s.assignments[0];
    assert_eq!(a.rooms.len(), 5);
    assert_eq!(a.invigilators[0], "Dr. Sen");
    let distinct: HashSet<&String> = a.invigilators.iter().collect();
    assert_eq!(distinct.len(), 5);
    assert_eq!(a.weekday, "Monday");

    let kpi = ExamKpi::calculate(&s, &invigilators);
    assert_eq!(kpi.rooms_allocated, 5);
    assert_eq!(kpi.duty_spread, 0);
}

#[test]
fn test_not_enough_rooms_warns_and_reports() {
    let courses = vec![ExamCourse::new("MA101", "CSE", 1, 100)];
    let invigilators = vec![Invigilator::new("A"), Invigilator::new("B")];
    let rooms = vec![Room::classroom("E1"), Room::classroom("E2")];
    let (start, end) = fifteen_dates();

    let s = generate_exam_schedule(
        &courses,
        &invigilators,
        &rooms,
        start,
        end,
        &ExamConfig::default(),
    )
    .unwrap();

    assert_eq!(s.assignment_count(), 0);
    assert_eq!(s.unscheduled[0].rooms_needed, 4);
    assert_eq!(s.unscheduled[0].attempts, 30);
    assert_eq!(s.warnings.len(), 2);
}

#[test]
fn test_reversed_range_rejected() {
    let err = generate_exam_schedule(
        &[ExamCourse::new("MA101", "CSE", 1, 10)],
        &[Invigilator::new("A")],
        &[Room::classroom("E1")],
        date(2024, 3, 20),
        date(2024, 3, 4),
        &ExamConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TimetableError::InvalidDateRange { .. }));
}

#[test]
fn test_exam_json_round_trip() {
    let courses: Vec<ExamCourse> = serde_json::from_str(
        r#"[
            {"code": "CS101", "name": "Programming", "credits": 4, "branch": "CSE",
             "year": 1, "students": 45, "exam_type": "theory", "faculty": "Dr. Rao"},
            {"code": "CS191", "branch": "CSE", "year": 1, "students": 45,
             "exam_type": "Viva"}
        ]"#,
    )
    .unwrap();
    assert_eq!(courses[1].exam_type, ExamType::Other);

    let s = generate_exam_schedule(
        &courses,
        &[Invigilator::new("Dr. Rao"), Invigilator::new("Dr. Sen")],
        &[Room::classroom("E1"), Room::classroom("E2")],
        date(2024, 3, 4),
        date(2024, 3, 5),
        &ExamConfig::default(),
    )
    .unwrap();
    assert_eq!(s.assignment_count(), 1);

    let out = serde_json::to_string(&s).unwrap();
    assert!(out.contains(r#""date":"2024-03-04""#));
    let back: ExamSchedule = serde_json::from_str(&out).unwrap();
    assert_eq!(back, s);
}
