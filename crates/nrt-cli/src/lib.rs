//! Terminal interface for NRT

mod progress;
mod ui;

pub use progress::CliProgress;
pub use ui::{display_banner, print_help, prompt_input, render_answer, render_error};

// Re-export core types
pub use nrt_core::{Error, Result};
