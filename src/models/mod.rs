/// Models module
/// Shared data types between the backend and the display layer.
/// All types here should be serializable/deserializable for IPC.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A saved source file backing an editor tab. Untitled buffers have no
/// `SourceFile` and are excluded from run and auto-save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SourceFile { path: path.into() }
    }

    /// Raw file name, as the language registry matches against it.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Containing directory; this is the working directory for every
    /// compile and run command.
    pub fn parent(&self) -> &Path {
        self.path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

/// Outcome of one compile step: merged stdout+stderr text plus exit code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    pub succeeded: bool,
    pub output: String,
    pub exit_code: u32,
}
