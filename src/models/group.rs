//! Student group (cohort) identity.
//!
//! A student group is the unit that must never attend two overlapping
//! sessions. Identity is `(branch, year, section)`; a group without a
//! section stands for the whole `(branch, year)` intake, so it shares
//! students with every section of that intake.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cohort of students scheduled as one unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentGroup {
    /// Branch / department code (e.g., "CSE").
    pub branch: String,
    /// Year of study (1-based).
    pub year: u8,
    /// Section label, if the intake is split.
    pub section: Option<String>,
}

impl StudentGroup {
    /// Creates a group without a section.
    pub fn new(branch: impl Into<String>, year: u8) -> Self {
        Self {
            branch: branch.into(),
            year,
            section: None,
        }
    }

    /// Sets the section.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Whether two groups belong to the same (branch, year) intake.
    pub fn same_intake(&self, other: &Self) -> bool {
        self.branch == other.branch && self.year == other.year
    }

    /// Whether some student belongs to both groups.
    ///
    /// True for equal groups, and for a whole intake against any of
    /// its sections. Two different sections never share students.
    pub fn shares_students(&self, other: &Self) -> bool {
        self.same_intake(other)
            && match (&self.section, &other.section) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }

    /// The whole-intake group this group belongs to.
    pub fn intake(&self) -> Self {
        Self::new(self.branch.clone(), self.year)
    }
}

impl fmt::Display for StudentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{}-{}-{}", self.branch, self.year, section),
            None => write!(f, "{}-{}", self.branch, self.year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(StudentGroup::new("CSE", 1).to_string(), "CSE-1");
        assert_eq!(
            StudentGroup::new("CSE", 1).with_section("A").to_string(),
            "CSE-1-A"
        );
    }

    #[test]
    fn test_same_intake() {
        let a = StudentGroup::new("CSE", 2).with_section("A");
        let b = StudentGroup::new("CSE", 2).with_section("B");
        let c = StudentGroup::new("ECE", 2).with_section("A");
        assert!(a.same_intake(&b));
        assert!(!a.same_intake(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_whole_intake_shares_students_with_sections() {
        let whole = StudentGroup::new("CSE", 1);
        let a = StudentGroup::new("CSE", 1).with_section("A");
        let b = StudentGroup::new("CSE", 1).with_section("B");
        assert!(whole.shares_students(&a));
        assert!(a.shares_students(&whole));
        assert!(a.shares_students(&a));
        assert!(!a.shares_students(&b));
        assert!(!whole.shares_students(&StudentGroup::new("CSE", 2)));
        assert_eq!(a.intake(), whole);
    }
}
