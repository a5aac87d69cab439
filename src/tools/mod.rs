// ABOUTME: Built-in tools for common agent operations.
// ABOUTME: Terminal execution, web browsing, file save, and web search.

mod browser;
mod google_search;
mod save_file;
mod terminal;

pub use browser::BrowserTool;
pub use google_search::GoogleSearchTool;
pub use save_file::SaveFileTool;
pub use terminal::TerminalTool;
