//! Run diagnostics.
//!
//! Diagnostics are warnings surfaced alongside a result: structural
//! resource shortages detected before placement, room fallbacks taken
//! during placement, and roster mismatches. They never abort a run.

use serde::{Deserialize, Serialize};

/// A warning attached to a scheduling result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Warning category.
    pub kind: DiagnosticKind,
    /// Related entity (cohort, course code, room kind...).
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Inputs cannot structurally fit the available rooms, staff, or time.
    ResourceShortage,
    /// A combined session fell back to a room below the large threshold.
    FallbackRoom,
    /// A course names faculty missing from the roster.
    UnknownFaculty,
}

impl Diagnostic {
    /// Creates a resource shortage warning.
    pub fn resource_shortage(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ResourceShortage,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Creates a fallback room warning.
    pub fn fallback_room(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::FallbackRoom,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown faculty warning.
    pub fn unknown_faculty(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnknownFaculty,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Whether this is a resource shortage.
    pub fn is_shortage(&self) -> bool {
        self.kind == DiagnosticKind::ResourceShortage
    }
}
