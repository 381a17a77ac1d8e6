//! Pipeline orchestration for paperscope.
//!
//! Three modules with one job each:
//! - [`prompt`] renders the literal text sent to the model
//! - [`extract`] recovers a `TierAssignment` from the model's free-form reply
//! - [`orchestrator`] sequences the stages and enforces idempotence
//!
//! The orchestrator is the only place with side effects; extraction and
//! rendering are pure and tested against fixtures.

pub mod extract;
pub mod orchestrator;
pub mod prompt;
pub mod report;

pub use orchestrator::Pipeline;
