//! Course registration service.
//!
//! Students search a course catalog, register for courses and drop them.
//! Registration is checked against capacity, a credit limit, meeting-time
//! conflicts and prerequisites before an enrollment is recorded.

pub mod catalog;
pub mod config;
pub mod registration;
pub mod schedule;
pub mod server;
pub mod store;
pub mod types;
