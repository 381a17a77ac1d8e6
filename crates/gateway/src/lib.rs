//! Model gateway implementations for paperscope.
//!
//! All gateways implement the `paperscope_core::Gateway` trait. The
//! pipeline never cares which backend answers; it only sees raw text.

pub mod openai_compat;
pub mod scripted;

pub use openai_compat::OpenAiCompatGateway;
pub use scripted::ScriptedGateway;
