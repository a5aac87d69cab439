// ABOUTME: Tool module - defines the tool trait, output type, registry,
// ABOUTME: and per-agent permission views.

mod output;
mod permit;
mod registry;
mod traits;

pub use output::*;
pub use permit::*;
pub use registry::*;
pub use traits::*;
