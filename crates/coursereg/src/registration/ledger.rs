//! The enrollment ledger: register and drop, with persistence.
//!
//! Each student's state sits behind its own async mutex that is held for
//! the entire attempt, registrar call included, so two requests for the same
//! student never interleave. The catalog is shared between students and is
//! only locked for short synchronous sections.

use super::error::LedgerError;
use super::gateway::RegistrationGateway;
use super::types::{EnrollmentRecord, EnrollmentSummary, StudentContext};
use super::validator::{self, Validation};
use crate::catalog::{Catalog, Course};
use crate::store::EnrollmentStore;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

pub struct RegistrationLedger {
    catalog: Mutex<Catalog>,
    students: DashMap<String, Arc<tokio::sync::Mutex<StudentContext>>>,
    store: Arc<dyn EnrollmentStore>,
    gateway: Arc<dyn RegistrationGateway>,
    max_credits: u32,
}

impl RegistrationLedger {
    pub fn new(
        catalog: Catalog,
        store: Arc<dyn EnrollmentStore>,
        gateway: Arc<dyn RegistrationGateway>,
        max_credits: u32,
    ) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            students: DashMap::new(),
            store,
            gateway,
            max_credits,
        }
    }

    fn catalog(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gets the student's context, loading their saved enrollments the first
    /// time they are seen.
    fn student(
        &self,
        student_id: &str,
    ) -> Result<Arc<tokio::sync::Mutex<StudentContext>>, LedgerError> {
        if let Some(ctx) = self.students.get(student_id) {
            return Ok(ctx.clone());
        }

        let enrolled = self.store.load(student_id)?;
        info!(
            student = %student_id,
            courses = enrolled.len(),
            "Loaded enrollment set"
        );

        let ctx = self
            .students
            .entry(student_id.to_string())
            .or_insert_with(|| {
                Arc::new(tokio::sync::Mutex::new(StudentContext::new(
                    student_id,
                    self.max_credits,
                    enrolled,
                )))
            })
            .clone();

        Ok(ctx)
    }

    /// Reads the student's context without registering an unknown student.
    ///
    /// A student with no saved enrollments gets a throwaway empty context, so
    /// read-only requests for arbitrary ids do not grow the student map.
    async fn read_student<T>(
        &self,
        student_id: &str,
        read: impl FnOnce(&StudentContext) -> T,
    ) -> Result<T, LedgerError> {
        if !self.students.contains_key(student_id) {
            let enrolled = self.store.load(student_id)?;
            if enrolled.is_empty() {
                let ctx = StudentContext::new(student_id, self.max_credits, enrolled);
                return Ok(read(&ctx));
            }
        }

        let student = self.student(student_id)?;
        let ctx = student.lock().await;
        Ok(read(&ctx))
    }

    /// Looks up a course that can be registered for.
    fn registrable_course(&self, course_id: &str) -> Result<Course, LedgerError> {
        let catalog = self.catalog();
        let course = catalog
            .find(course_id)
            .ok_or_else(|| LedgerError::CourseNotFound {
                course_id: course_id.to_string(),
            })?;

        if !course.active {
            return Err(LedgerError::CourseInactive {
                course_id: course_id.to_string(),
            });
        }

        Ok(course.clone())
    }

    /// Runs every registration check without changing anything.
    pub async fn check(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<Validation, LedgerError> {
        let course = self.registrable_course(course_id)?;
        self.read_student(student_id, |ctx| {
            validator::validate(&course, &ctx.enrolled, ctx.max_credits)
        })
        .await
    }

    /// Registers the student for a course.
    ///
    /// On success the enrollment record is added, the course's enrollment
    /// count goes up by one and the new set is saved. On any failure nothing
    /// changes.
    pub async fn register(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<EnrollmentRecord, LedgerError> {
        let student = self.student(student_id)?;
        let mut ctx = student.lock().await;

        let candidate = self.registrable_course(course_id)?;
        validator::validate(&candidate, &ctx.enrolled, ctx.max_credits)
            .into_result()
            .map_err(|rejection| {
                warn!(
                    student = %student_id,
                    course = %course_id,
                    reason = %rejection.message,
                    "Registration rejected"
                );
                LedgerError::Rejected(rejection)
            })?;

        if let Err(e) = self.gateway.attempt_register(&candidate).await {
            warn!(student = %student_id, course = %course_id, error = %e, "Registrar call failed");
            return Err(LedgerError::RegisterFailed(e));
        }

        let record = {
            let mut catalog = self.catalog();
            let course = catalog
                .find_mut(course_id)
                .ok_or_else(|| LedgerError::CourseNotFound {
                    course_id: course_id.to_string(),
                })?;

            // Another student may have taken the last seat while we waited.
            validator::check_capacity(course).map_err(LedgerError::Rejected)?;

            let record = EnrollmentRecord::new(course.clone());
            let mut next = ctx.enrolled.clone();
            next.push(record.clone());
            self.store.save(student_id, &next)?;

            course.current_enrollment += 1;
            ctx.enrolled = next;
            record
        };

        info!(
            student = %student_id,
            course = %course_id,
            total_credits = ctx.total_credits(),
            "Registered for course"
        );

        Ok(record)
    }

    /// Drops a course from the student's enrollment set.
    ///
    /// On success the record is removed, the catalog course's enrollment
    /// count goes down by one (if the course is still listed) and the new set
    /// is saved. On any failure nothing changes.
    pub async fn drop_course(
        &self,
        student_id: &str,
        course_id: &str,
    ) -> Result<EnrollmentRecord, LedgerError> {
        let student = self.student(student_id)?;
        let mut ctx = student.lock().await;

        let index = ctx
            .enrolled
            .iter()
            .position(|r| r.course.id == course_id)
            .ok_or_else(|| {
                warn!(
                    student = %student_id,
                    course = %course_id,
                    "Drop for course not in schedule"
                );
                LedgerError::NotEnrolled {
                    course_id: course_id.to_string(),
                }
            })?;

        let dropped = ctx.enrolled[index].clone();
        if let Err(e) = self.gateway.attempt_drop(&dropped.course).await {
            warn!(student = %student_id, course = %course_id, error = %e, "Registrar call failed");
            return Err(LedgerError::DropFailed(e));
        }

        {
            let mut catalog = self.catalog();
            let mut next = ctx.enrolled.clone();
            next.remove(index);
            self.store.save(student_id, &next)?;

            if let Some(course) = catalog.find_mut(course_id) {
                course.current_enrollment = course.current_enrollment.saturating_sub(1);
            }
            ctx.enrolled = next;
        }

        info!(
            student = %student_id,
            course = %course_id,
            total_credits = ctx.total_credits(),
            "Dropped course"
        );

        Ok(dropped)
    }

    pub async fn enrollments(
        &self,
        student_id: &str,
    ) -> Result<Vec<EnrollmentRecord>, LedgerError> {
        self.read_student(student_id, |ctx| ctx.enrolled.clone())
            .await
    }

    pub async fn summary(&self, student_id: &str) -> Result<EnrollmentSummary, LedgerError> {
        self.read_student(student_id, StudentContext::summary).await
    }

    /// Snapshot of every catalog course, in catalog order.
    pub fn available(&self) -> Vec<Course> {
        self.catalog().courses().to_vec()
    }

    pub fn search(&self, query: &str) -> Vec<Course> {
        self.catalog().search(query).into_iter().cloned().collect()
    }

    pub fn course(&self, course_id: &str) -> Option<Course> {
        self.catalog().find(course_id).cloned()
    }
}
