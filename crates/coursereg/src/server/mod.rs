use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{courses, enrollment, status};
use crate::types::AppState;

mod endpoints;
pub mod types;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let student_router = Router::new()
        .route("/enrollments", get(enrollment::get_enrollments))
        .route("/validate", post(enrollment::post_validate))
        .route("/register", post(enrollment::post_register))
        .route("/drop", post(enrollment::post_drop));

    Router::new()
        .route("/health", get(status::get_health))
        .route("/courses", get(courses::get_courses))
        .route("/courses/:course_id", get(courses::get_course))
        .nest("/students/:student_id", student_router)
        .with_state(app_state)
}
