/// Types for a student's enrollment state
use crate::catalog::Course;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A course the student is enrolled in, as it looked when they registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    #[serde(flatten)]
    pub course: Course,
    pub enrolled_at: DateTime<Utc>,
}

impl EnrollmentRecord {
    pub fn new(course: Course) -> Self {
        Self {
            course,
            enrolled_at: Utc::now(),
        }
    }
}

/// One student's registration state.
#[derive(Debug, Clone)]
pub struct StudentContext {
    pub student_id: String,
    pub max_credits: u32,
    /// Unique by course id
    pub enrolled: Vec<EnrollmentRecord>,
}

impl StudentContext {
    pub fn new(
        student_id: impl Into<String>,
        max_credits: u32,
        enrolled: Vec<EnrollmentRecord>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            max_credits,
            enrolled,
        }
    }

    pub fn total_credits(&self) -> u32 {
        total_credits(&self.enrolled)
    }

    pub fn summary(&self) -> EnrollmentSummary {
        EnrollmentSummary {
            student_id: self.student_id.clone(),
            total_credits: self.total_credits(),
            course_count: self.enrolled.len(),
            max_credits: self.max_credits,
        }
    }
}

pub(crate) fn total_credits(enrolled: &[EnrollmentRecord]) -> u32 {
    enrolled
        .iter()
        .fold(0u32, |sum, r| sum.saturating_add(r.course.credits))
}

/// Totals shown alongside the enrolled course list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSummary {
    pub student_id: String,
    pub total_credits: u32,
    pub course_count: usize,
    pub max_credits: u32,
}
