//! Catalog endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::catalog::Course;
use crate::server::endpoints::enrollment::ledger_error_to_response;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Matched against course code, name and department
    #[serde(default)]
    pub q: String,
    /// When set, each result says whether this student is already enrolled
    pub student_id: Option<String>,
}

/// A catalog course with the availability fields clients render.
#[derive(Debug, Serialize)]
pub struct CourseListing {
    #[serde(flatten)]
    pub course: Course,
    pub spots_available: u32,
    pub is_full: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled: Option<bool>,
}

impl CourseListing {
    fn new(course: Course, enrolled: Option<bool>) -> Self {
        Self {
            spots_available: course.spots_available(),
            is_full: course.is_full(),
            course,
            enrolled,
        }
    }
}

/// GET /courses?q=&student_id=
pub async fn get_courses(
    State(s): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    info!("GET /courses (q={:?})", params.q);

    let enrolled_ids: Option<HashSet<String>> = match &params.student_id {
        Some(student_id) => match s.ledger.enrollments(student_id).await {
            Ok(records) => Some(records.into_iter().map(|r| r.course.id).collect()),
            Err(e) => return ledger_error_to_response(e, s.config.notice_dismiss_ms),
        },
        None => None,
    };

    let listings: Vec<CourseListing> = s
        .ledger
        .search(&params.q)
        .into_iter()
        .map(|course| {
            let enrolled = enrolled_ids.as_ref().map(|ids| ids.contains(&course.id));
            CourseListing::new(course, enrolled)
        })
        .collect();

    (StatusCode::OK, Json(listings)).into_response()
}

/// GET /courses/:course_id
pub async fn get_course(
    Path(course_id): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /courses/{}", course_id);

    match s.ledger.course(&course_id) {
        Some(course) => (StatusCode::OK, Json(CourseListing::new(course, None))).into_response(),
        None => ApiErrorType::from((
            StatusCode::NOT_FOUND,
            "Course not found",
            Some(course_id),
        ))
        .into_response(),
    }
}
