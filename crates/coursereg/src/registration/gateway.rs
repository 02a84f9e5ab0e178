//! The registrar the ledger talks to before committing a change.
//!
//! There is no real upstream system; [`SimulatedGateway`] adds latency and
//! random failures so clients see realistic behavior, and [`FixedGateway`]
//! gives tests a deterministic answer.

use crate::catalog::Course;
use crate::config::GatewayConfig;
use futures::future::BoxFuture;
use futures::FutureExt;
use rand::Rng;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOp {
    Register,
    Drop,
}

impl fmt::Display for GatewayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayOp::Register => f.write_str("register"),
            GatewayOp::Drop => f.write_str("drop"),
        }
    }
}

/// A registrar call that did not go through. Always safe to retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Registrar {op} request for {course_id} failed")]
pub struct GatewayError {
    pub op: GatewayOp,
    pub course_id: String,
}

/// Registrar calls made by the ledger. Implementations must not touch
/// ledger state; they only report whether the upstream accepted the change.
pub trait RegistrationGateway: Send + Sync {
    fn attempt_register<'a>(
        &'a self,
        course: &'a Course,
    ) -> BoxFuture<'a, Result<(), GatewayError>>;

    fn attempt_drop<'a>(&'a self, course: &'a Course) -> BoxFuture<'a, Result<(), GatewayError>>;
}

/// Sleeps for a configured delay, then fails with a configured probability.
pub struct SimulatedGateway {
    config: GatewayConfig,
}

impl SimulatedGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    async fn simulate(
        &self,
        op: GatewayOp,
        course: &Course,
        delay: Duration,
        failure_rate: f64,
    ) -> Result<(), GatewayError> {
        tokio::time::sleep(delay).await;

        let roll: f64 = rand::thread_rng().gen();
        let failed = roll < failure_rate;
        debug!(
            op = %op,
            course = %course.id,
            delay_ms = delay.as_millis() as u64,
            failed,
            "Simulated registrar call finished"
        );

        if failed {
            Err(GatewayError {
                op,
                course_id: course.id.clone(),
            })
        } else {
            Ok(())
        }
    }
}

impl RegistrationGateway for SimulatedGateway {
    fn attempt_register<'a>(
        &'a self,
        course: &'a Course,
    ) -> BoxFuture<'a, Result<(), GatewayError>> {
        self.simulate(
            GatewayOp::Register,
            course,
            Duration::from_millis(self.config.register_delay_ms),
            self.config.register_failure_rate,
        )
        .boxed()
    }

    fn attempt_drop<'a>(&'a self, course: &'a Course) -> BoxFuture<'a, Result<(), GatewayError>> {
        self.simulate(
            GatewayOp::Drop,
            course,
            Duration::from_millis(self.config.drop_delay_ms),
            self.config.drop_failure_rate,
        )
        .boxed()
    }
}

/// Answers with a fixed outcome per operation after yielding to the scheduler
/// once, so concurrent callers interleave at the registrar call.
#[derive(Debug, Clone, Copy)]
pub struct FixedGateway {
    pub register_ok: bool,
    pub drop_ok: bool,
}

impl FixedGateway {
    pub fn succeeding() -> Self {
        Self {
            register_ok: true,
            drop_ok: true,
        }
    }

    pub fn failing() -> Self {
        Self {
            register_ok: false,
            drop_ok: false,
        }
    }

    fn outcome(ok: bool, op: GatewayOp, course: &Course) -> Result<(), GatewayError> {
        if ok {
            Ok(())
        } else {
            Err(GatewayError {
                op,
                course_id: course.id.clone(),
            })
        }
    }

    fn after_yield<'a>(
        outcome: Result<(), GatewayError>,
    ) -> BoxFuture<'a, Result<(), GatewayError>> {
        async move {
            tokio::task::yield_now().await;
            outcome
        }
        .boxed()
    }
}

impl RegistrationGateway for FixedGateway {
    fn attempt_register<'a>(
        &'a self,
        course: &'a Course,
    ) -> BoxFuture<'a, Result<(), GatewayError>> {
        Self::after_yield(Self::outcome(self.register_ok, GatewayOp::Register, course))
    }

    fn attempt_drop<'a>(&'a self, course: &'a Course) -> BoxFuture<'a, Result<(), GatewayError>> {
        Self::after_yield(Self::outcome(self.drop_ok, GatewayOp::Drop, course))
    }
}
