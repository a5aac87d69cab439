// ABOUTME: LLM module - client abstraction for language model providers.
// ABOUTME: Defines types, traits, provider implementations, and the model factory.

mod anthropic;
mod client;
mod factory;
mod openai;
mod types;

pub use anthropic::*;
pub use client::*;
pub use factory::*;
pub use openai::*;
pub use types::*;
