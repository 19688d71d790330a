//! Course and faculty models.
//!
//! A course record describes one kind of teaching activity (lecture,
//! tutorial, or lab) for one cohort. The session type fixes both the
//! session length and how many sessions are held per week.
//!
//! | Type | Minutes | Sessions/week | Room |
//! |------|---------|---------------|------|
//! | Lecture | 90 | 2 | Classroom |
//! | Tutorial | 60 | 1 | Classroom |
//! | Lab | 120 | 1 | Lab |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{RoomKind, StudentGroup};

/// Kind of teaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(alias = "lecture", alias = "L")]
    Lecture,
    #[serde(alias = "tutorial", alias = "T")]
    Tutorial,
    #[serde(alias = "lab", alias = "P", alias = "Practical")]
    Lab,
}

impl SessionType {
    /// Session length (minutes).
    pub fn duration_minutes(self) -> u32 {
        match self {
            Self::Lecture => 90,
            Self::Tutorial => 60,
            Self::Lab => 120,
        }
    }

    /// Sessions held per week.
    pub fn sessions_per_week(self) -> usize {
        match self {
            Self::Lecture => 2,
            Self::Tutorial | Self::Lab => 1,
        }
    }

    /// Room kind this session requires.
    pub fn room_kind(self) -> RoomKind {
        match self {
            Self::Lab => RoomKind::Lab,
            Self::Lecture | Self::Tutorial => RoomKind::Classroom,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Lecture => "Lecture",
            Self::Tutorial => "Tutorial",
            Self::Lab => "Lab",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which part of the semester a course runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemesterHalf {
    /// Runs the whole semester (unflagged).
    #[default]
    Full,
    /// First half only.
    FirstOnly,
    /// Second half only.
    SecondOnly,
}

/// A scheduling epoch for class sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Half {
    First,
    Second,
}

impl Half {
    /// Both halves, in run order.
    pub const ALL: [Half; 2] = [Half::First, Half::Second];
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("First Half"),
            Self::Second => f.write_str("Second Half"),
        }
    }
}

/// A course to be placed on the weekly timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course code (e.g., "CS101").
    pub code: String,
    /// Course title.
    #[serde(default)]
    pub name: String,
    /// Teaching faculty; every listed name is booked for every session.
    pub faculty: Vec<String>,
    /// Session kind.
    pub session_type: SessionType,
    /// Branch / department code.
    pub branch: String,
    /// Year of study.
    pub year: u8,
    /// Section, if the intake is split.
    #[serde(default)]
    pub section: Option<String>,
    /// Credit weight.
    #[serde(default)]
    pub credits: u8,
    /// Semester-half flag.
    #[serde(default)]
    pub semester_half: SemesterHalf,
    /// Sections taught jointly in one room. Empty = not combined.
    #[serde(default)]
    pub combined_sections: Vec<String>,
}

impl Course {
    /// Creates a course for the whole `(branch, year)` intake.
    pub fn new(
        code: impl Into<String>,
        session_type: SessionType,
        branch: impl Into<String>,
        year: u8,
    ) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            faculty: Vec::new(),
            session_type,
            branch: branch.into(),
            year,
            section: None,
            credits: 0,
            semester_half: SemesterHalf::Full,
            combined_sections: Vec::new(),
        }
    }

    /// Sets the course title.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a faculty member.
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty.push(faculty.into());
        self
    }

    /// Sets the section.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Sets the credit weight.
    pub fn with_credits(mut self, credits: u8) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the semester-half flag.
    pub fn with_semester_half(mut self, half: SemesterHalf) -> Self {
        self.semester_half = half;
        self
    }

    /// Marks the course as taught jointly to the given sections.
    pub fn with_combined_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.combined_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this course is taught to several sections at once.
    pub fn is_combined(&self) -> bool {
        !self.combined_sections.is_empty()
    }

    /// The course's natural cohort.
    pub fn cohort(&self) -> StudentGroup {
        StudentGroup {
            branch: self.branch.clone(),
            year: self.year,
            section: self.section.clone(),
        }
    }

    /// Student groups attending every session of this course.
    ///
    /// A combined course covers each listed section; otherwise the
    /// natural cohort.
    pub fn groups(&self) -> Vec<StudentGroup> {
        if self.is_combined() {
            let mut groups: Vec<StudentGroup> = self
                .combined_sections
                .iter()
                .map(|s| StudentGroup::new(self.branch.clone(), self.year).with_section(s.clone()))
                .collect();
            groups.sort();
            groups.dedup();
            groups
        } else {
            vec![self.cohort()]
        }
    }

    /// Session label, e.g. `Lecture 2 of 2` or `Lab`.
    pub fn session_label(&self, index: usize) -> String {
        let total = self.session_type.sessions_per_week();
        if total > 1 {
            format!("{} {} of {}", self.session_type, index + 1, total)
        } else {
            self.session_type.to_string()
        }
    }
}

/// A faculty member on the teaching roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    /// Name, as referenced by [`Course::faculty`].
    pub name: String,
    /// Home department.
    #[serde(default)]
    pub department: Option<String>,
}

impl Faculty {
    /// Creates a faculty record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            department: None,
        }
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_type_rules() {
        assert_eq!(SessionType::Lecture.duration_minutes(), 90);
        assert_eq!(SessionType::Lecture.sessions_per_week(), 2);
        assert_eq!(SessionType::Tutorial.duration_minutes(), 60);
        assert_eq!(SessionType::Lab.duration_minutes(), 120);
        assert_eq!(SessionType::Lab.room_kind(), RoomKind::Lab);
        assert_eq!(SessionType::Tutorial.room_kind(), RoomKind::Classroom);
    }

    #[test]
    fn test_course_builder() {
        let c = Course::new("CS101", SessionType::Lecture, "CSE", 1)
            .with_name("Programming")
            .with_faculty("Dr. Rao")
            .with_section("A")
            .with_credits(4)
            .with_semester_half(SemesterHalf::FirstOnly);

        assert_eq!(c.code, "CS101");
        assert_eq!(c.faculty, vec!["Dr. Rao".to_string()]);
        assert_eq!(c.cohort(), StudentGroup::new("CSE", 1).with_section("A"));
        assert!(!c.is_combined());
        assert_eq!(c.groups().len(), 1);
    }

    #[test]
    fn test_combined_groups() {
        let c = Course::new("MA101", SessionType::Lecture, "CSE", 1)
            .with_combined_sections(["B", "A", "A"]);
        assert!(c.is_combined());
        let groups = c.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].section.as_deref(), Some("A"));
    }

    #[test]
    fn test_session_labels() {
        let lecture = Course::new("CS101", SessionType::Lecture, "CSE", 1);
        assert_eq!(lecture.session_label(1), "Lecture 2 of 2");
        let lab = Course::new("CS101L", SessionType::Lab, "CSE", 1);
        assert_eq!(lab.session_label(0), "Lab");
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "code": "CS201",
            "faculty": ["Dr. Iyer"],
            "session_type": "lab",
            "branch": "CSE",
            "year": 2
        }"#;
        let c: Course = serde_json::from_str(json).unwrap();
        assert_eq!(c.session_type, SessionType::Lab);
        assert_eq!(c.semester_half, SemesterHalf::Full);
        assert_eq!(c.section, None);
        assert_eq!(c.credits, 0);
    }
}
