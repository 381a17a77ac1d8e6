//! # Paperscope Core
//!
//! Domain types, traits, and error definitions for the paperscope arXiv
//! triage pipeline. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators the pipeline depends on — the paper feed
//! and the text-generation model — are defined as traits here. Implementations
//! live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Testing the orchestrator with scripted stubs
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod gateway;
pub mod paper;
pub mod source;
pub mod stage;
pub mod tiers;

// Re-export key types at crate root for ergonomics
pub use error::{CacheError, Error, ExtractionError, GatewayError, Result, SourceError};
pub use gateway::{CompletionRequest, Gateway};
pub use paper::{Dataset, PaperRecord};
pub use source::PaperSource;
pub use stage::{PipelineState, RunOutcome, Stage};
pub use tiers::TierAssignment;
