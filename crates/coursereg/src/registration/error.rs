//! Error types for register/drop operations.

use super::gateway::GatewayError;
use super::validator::Rejection;
use crate::store::StoreError;
use thiserror::Error;

/// Errors returned by the enrollment ledger. None of them leave partial
/// changes behind.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The course id is not in the catalog
    #[error("Course {course_id} not found")]
    CourseNotFound { course_id: String },

    /// The course id is not in the student's enrollment set
    #[error("Course {course_id} not found in enrollment set")]
    NotEnrolled { course_id: String },

    /// The course exists but is closed for registration
    #[error("Course {course_id} is not active")]
    CourseInactive { course_id: String },

    /// The validator refused the registration
    #[error("Registration rejected: {}", .0.message)]
    Rejected(Rejection),

    /// The registrar did not accept the registration
    #[error("Registration failed: {0}")]
    RegisterFailed(#[source] GatewayError),

    /// The registrar did not accept the drop
    #[error("Drop failed: {0}")]
    DropFailed(#[source] GatewayError),

    /// Enrollment could not be persisted
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns true if re-issuing the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::RegisterFailed(_) | LedgerError::DropFailed(_)
        )
    }

    /// The message to show the student.
    pub fn user_message(&self) -> String {
        match self {
            LedgerError::CourseNotFound { .. } => "Course not found.".to_string(),
            LedgerError::NotEnrolled { .. } => "Course not found in your schedule.".to_string(),
            LedgerError::CourseInactive { .. } => {
                "This course is not open for registration.".to_string()
            }
            LedgerError::Rejected(rejection) => rejection.message.clone(),
            LedgerError::RegisterFailed(_) => "Registration failed. Please try again.".to_string(),
            LedgerError::DropFailed(_) => "Failed to drop course. Please try again.".to_string(),
            LedgerError::Store(_) => {
                "Your enrollment could not be saved. Please try again.".to_string()
            }
        }
    }
}
