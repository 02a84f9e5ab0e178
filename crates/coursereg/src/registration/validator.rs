//! Registration eligibility checks.
//!
//! [`validate`] decides whether a student may register for a course given
//! what they are already enrolled in. Checks run in a fixed order and the
//! first failure is reported:
//! 1. Already enrolled
//! 2. Course full
//! 3. Credit limit
//! 4. Schedule conflict
//! 5. Missing prerequisites

use super::types::{total_credits, EnrollmentRecord};
use crate::catalog::Course;
use crate::schedule::meetings_overlap;
use serde::{Deserialize, Serialize};

/// Outcome of a registration check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Validation {
    Accepted,
    Rejected(Rejection),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted)
    }

    /// Converts into a `Result`, for use with `?`.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            Validation::Accepted => Ok(()),
            Validation::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Why a registration was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    /// Message suitable for showing to the student
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionKind {
    AlreadyEnrolled,
    CourseFull,
    ExceedsMaxCredits { max_credits: u32 },
    ScheduleConflict { course_id: String },
    PrerequisitesMissing { missing: Vec<String> },
}

impl Rejection {
    pub fn already_enrolled() -> Self {
        Self {
            kind: RejectionKind::AlreadyEnrolled,
            message: "You are already enrolled in this course.".to_string(),
        }
    }

    pub fn course_full() -> Self {
        Self {
            kind: RejectionKind::CourseFull,
            message: "This course is full.".to_string(),
        }
    }

    pub fn exceeds_max_credits(max_credits: u32) -> Self {
        Self {
            kind: RejectionKind::ExceedsMaxCredits { max_credits },
            message: format!(
                "This would exceed your maximum credit limit of {}.",
                max_credits
            ),
        }
    }

    pub fn schedule_conflict(with: &Course) -> Self {
        Self {
            kind: RejectionKind::ScheduleConflict {
                course_id: with.id.clone(),
            },
            message: format!("Schedule conflict with {}", with.display_name()),
        }
    }

    pub fn prerequisites_missing(missing: Vec<String>) -> Self {
        Self {
            message: format!("Prerequisites not met: {}", missing.join(", ")),
            kind: RejectionKind::PrerequisitesMissing { missing },
        }
    }
}

/// Decides whether `candidate` may be added to `enrolled`.
///
/// Pure: the same inputs always give the same answer.
pub fn validate(candidate: &Course, enrolled: &[EnrollmentRecord], max_credits: u32) -> Validation {
    match check(candidate, enrolled, max_credits) {
        Ok(()) => Validation::Accepted,
        Err(rejection) => Validation::Rejected(rejection),
    }
}

fn check(
    candidate: &Course,
    enrolled: &[EnrollmentRecord],
    max_credits: u32,
) -> Result<(), Rejection> {
    if enrolled.iter().any(|r| r.course.id == candidate.id) {
        return Err(Rejection::already_enrolled());
    }

    check_capacity(candidate)?;

    let credits = total_credits(enrolled).saturating_add(candidate.credits);
    if credits > max_credits {
        return Err(Rejection::exceeds_max_credits(max_credits));
    }

    if let Some(conflict) = find_conflict(candidate, enrolled) {
        return Err(Rejection::schedule_conflict(conflict));
    }

    let missing: Vec<String> = candidate
        .prerequisites
        .iter()
        .filter(|p| !enrolled.iter().any(|r| &r.course.id == *p))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(Rejection::prerequisites_missing(missing));
    }

    Ok(())
}

/// Capacity check on its own, for re-checking a seat right before it is taken.
pub fn check_capacity(course: &Course) -> Result<(), Rejection> {
    if course.is_full() {
        return Err(Rejection::course_full());
    }
    Ok(())
}

/// Returns the first enrolled course whose meeting time collides with `candidate`.
pub fn find_conflict<'a>(
    candidate: &Course,
    enrolled: &'a [EnrollmentRecord],
) -> Option<&'a Course> {
    enrolled
        .iter()
        .map(|r| &r.course)
        .find(|c| meetings_overlap(c.meeting.as_ref(), candidate.meeting.as_ref()))
}
