//! Course registration: eligibility rules and the enrollment ledger.

mod error;
pub mod gateway;
mod ledger;
mod types;
pub mod validator;

pub use error::LedgerError;
pub use gateway::{FixedGateway, GatewayError, RegistrationGateway, SimulatedGateway};
pub use ledger::RegistrationLedger;
pub use types::*;
pub use validator::{validate, Rejection, RejectionKind, Validation};
