//! Registration endpoints for a single student.
//!
//! Register and drop responses, rejected validations and every error carry a
//! `notice` with the message the client should show and how long to keep it
//! visible. Plain reads do not.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::registration::{EnrollmentRecord, EnrollmentSummary, LedgerError, Validation};
use crate::server::types::{ApiErrorType, Notice};
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub course_id: String,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub record: EnrollmentRecord,
    pub summary: EnrollmentSummary,
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    #[serde(flatten)]
    pub validation: Validation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub enrolled: Vec<EnrollmentRecord>,
    pub summary: EnrollmentSummary,
}

/// Maps a ledger error to a status code and an error notice.
pub fn ledger_error_to_response(error: LedgerError, dismiss_after_ms: u64) -> Response {
    let (status, message) = match &error {
        LedgerError::CourseNotFound { .. } | LedgerError::NotEnrolled { .. } => {
            (StatusCode::NOT_FOUND, "Course not found")
        }
        LedgerError::CourseInactive { .. } => (StatusCode::CONFLICT, "Course not active"),
        LedgerError::Rejected(_) => (StatusCode::CONFLICT, "Registration rejected"),
        LedgerError::RegisterFailed(_) | LedgerError::DropFailed(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "Registrar unavailable")
        }
        LedgerError::Store(_) => {
            error!("Enrollment storage failed: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save enrollment")
        }
    };

    let notice = Notice::error(error.user_message(), dismiss_after_ms);
    ApiErrorType::from((status, message, Some(error.to_string())))
        .with_notice(notice)
        .into_response()
}

/// GET /students/:student_id/enrollments
pub async fn get_enrollments(
    Path(student_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /students/{}/enrollments", student_id);

    let result = async {
        let enrolled = s.ledger.enrollments(&student_id).await?;
        let summary = s.ledger.summary(&student_id).await?;
        Ok::<_, LedgerError>(ScheduleResponse { enrolled, summary })
    }
    .await;

    match result {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(e) => ledger_error_to_response(e, s.config.notice_dismiss_ms),
    }
}

/// POST /students/:student_id/validate
///
/// Runs the registration checks without registering.
pub async fn post_validate(
    Path(student_id): Path<String>,
    State(s): State<Arc<AppState>>,
    Json(req): Json<CourseRequest>,
) -> Response {
    info!("POST /students/{}/validate ({})", student_id, req.course_id);

    let dismiss = s.config.notice_dismiss_ms;
    match s.ledger.check(&student_id, &req.course_id).await {
        Ok(validation) => {
            let (status, notice) = match &validation {
                Validation::Accepted => (StatusCode::OK, None),
                Validation::Rejected(rejection) => (
                    StatusCode::CONFLICT,
                    Some(Notice::error(rejection.message.clone(), dismiss)),
                ),
            };
            (status, Json(ValidationResponse { validation, notice })).into_response()
        }
        Err(e) => ledger_error_to_response(e, dismiss),
    }
}

/// POST /students/:student_id/register
pub async fn post_register(
    Path(student_id): Path<String>,
    State(s): State<Arc<AppState>>,
    Json(req): Json<CourseRequest>,
) -> Response {
    info!("POST /students/{}/register ({})", student_id, req.course_id);

    let dismiss = s.config.notice_dismiss_ms;
    match s.ledger.register(&student_id, &req.course_id).await {
        Ok(record) => {
            let message = format!(
                "Successfully registered for {}",
                record.course.display_name()
            );
            enrollment_response(&s, &student_id, record, Notice::success(message, dismiss)).await
        }
        Err(e) => ledger_error_to_response(e, dismiss),
    }
}

/// POST /students/:student_id/drop
pub async fn post_drop(
    Path(student_id): Path<String>,
    State(s): State<Arc<AppState>>,
    Json(req): Json<CourseRequest>,
) -> Response {
    info!("POST /students/{}/drop ({})", student_id, req.course_id);

    let dismiss = s.config.notice_dismiss_ms;
    match s.ledger.drop_course(&student_id, &req.course_id).await {
        Ok(record) => {
            let message = format!("Successfully dropped {}", record.course.display_name());
            enrollment_response(&s, &student_id, record, Notice::success(message, dismiss)).await
        }
        Err(e) => ledger_error_to_response(e, dismiss),
    }
}

async fn enrollment_response(
    s: &AppState,
    student_id: &str,
    record: EnrollmentRecord,
    notice: Notice,
) -> Response {
    match s.ledger.summary(student_id).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(EnrollmentResponse {
                record,
                summary,
                notice,
            }),
        )
            .into_response(),
        Err(e) => ledger_error_to_response(e, s.config.notice_dismiss_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::AppConfig;
    use crate::registration::{FixedGateway, RegistrationLedger};
    use crate::store::MemoryStore;

    fn state(gateway: FixedGateway) -> Arc<AppState> {
        let ledger = RegistrationLedger::new(
            Catalog::mock(),
            Arc::new(MemoryStore::new()),
            Arc::new(gateway),
            18,
        );
        Arc::new(AppState::new(ledger, AppConfig::default()))
    }

    fn request(course_id: &str) -> Json<CourseRequest> {
        Json(CourseRequest {
            course_id: course_id.to_string(),
        })
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let s = state(FixedGateway::succeeding());

        let resp = post_register(Path("S1".to_string()), State(s.clone()), request("CS101")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = post_register(Path("S1".to_string()), State(s.clone()), request("CS101")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_unknown_course_is_not_found() {
        let s = state(FixedGateway::succeeding());
        let resp = post_register(Path("S1".to_string()), State(s), request("XX000")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_registrar_failure_is_service_unavailable() {
        let s = state(FixedGateway::failing());
        let resp = post_register(Path("S1".to_string()), State(s.clone()), request("CS101")).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(s.ledger.enrollments("S1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drop_not_enrolled_is_not_found() {
        let s = state(FixedGateway::succeeding());
        let resp = post_drop(Path("S1".to_string()), State(s), request("CS101")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validate_full_course_is_conflict() {
        let s = state(FixedGateway::succeeding());
        let resp = post_validate(Path("S1".to_string()), State(s.clone()), request("ENG150")).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "rejected");
        assert_eq!(body["notice"]["kind"], "error");
        assert_eq!(body["notice"]["message"], "This course is full.");
        assert_eq!(body["notice"]["dismiss_after_ms"], 5000);

        let resp = post_validate(Path("S1".to_string()), State(s), request("PHY210")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["status"], "accepted");
        assert!(body.get("notice").is_none());
    }

    #[tokio::test]
    async fn test_enrollments_after_register_and_drop() {
        let s = state(FixedGateway::succeeding());
        post_register(Path("S1".to_string()), State(s.clone()), request("PHY210")).await;
        post_register(Path("S1".to_string()), State(s.clone()), request("BIO105")).await;
        let resp = post_drop(Path("S1".to_string()), State(s.clone()), request("PHY210")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = get_enrollments(Path("S1".to_string()), State(s.clone())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let summary = s.ledger.summary("S1").await.unwrap();
        assert_eq!(summary.total_credits, 3);
        assert_eq!(summary.course_count, 1);
    }
}
