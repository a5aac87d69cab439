// ABOUTME: Root module for squad - team-based agent orchestration library.
// ABOUTME: Re-exports all public types from submodules.

pub mod error;
pub mod llm;
pub mod team;
pub mod tool;
pub mod tools;

pub mod prelude;

pub use error::SquadError;
