//! Error taxonomy for the run pipeline and consoles. Every variant is
//! caught at the command boundary and converted to a [`UiEvent`]; nothing
//! here propagates as a panic.
//!
//! [`UiEvent`]: crate::events::UiEvent

use thiserror::Error;

use crate::services::console::ConsoleId;

#[derive(Debug, Error)]
pub enum RunError {
    /// Extension not in the language registry. No process is started.
    #[error("{0} is not supported for running")]
    Unsupported(String),

    /// Compiler exited non-zero; `diagnostics` is the merged output text.
    #[error("{language} compilation failed with exit code {exit_code}")]
    CompileFailed {
        language: &'static str,
        exit_code: u32,
        diagnostics: String,
    },

    /// Spawning the compiler or the run command itself failed, e.g. the
    /// toolchain is not on the search path.
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("failed to forward input to console {console}: {message}")]
    Input { console: ConsoleId, message: String },
}
