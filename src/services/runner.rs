//! Language registry: maps a source file's extension to a compile+run plan.
//!
//! Resolution is pure and side-effect free. Matching is a case-sensitive
//! suffix match against the raw file name, so `Main.java` resolves and
//! `MAIN.JAVA` does not.

use std::path::PathBuf;

use crate::error::RunError;
use crate::models::SourceFile;

/// One external command: program name (resolved on the search path) plus
/// its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Concrete compile+run recipe for one invocation. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Display label for diagnostics titles ("Java Compilation Error").
    pub language: &'static str,
    pub compile: Option<CommandSpec>,
    pub run: CommandSpec,
    /// Working directory for both steps: the source file's parent.
    pub cwd: PathBuf,
}

/// Where a natively-compiled artifact lands: the system temp directory,
/// named after the source's base name with the platform executable suffix.
/// Two concurrent runs of same-named files in different directories would
/// race on this path; known limitation inherited from the recipe format.
pub fn artifact_path(stem: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{stem}{}", std::env::consts::EXE_SUFFIX))
}

pub fn resolve(source: &SourceFile) -> Result<RunPlan, RunError> {
    let name = source.file_name().to_string();
    let cwd = source.parent().to_path_buf();

    if let Some(stem) = name.strip_suffix(".java") {
        // javac drops the class files next to the source; java runs the
        // bare class name from the same directory.
        Ok(RunPlan {
            language: "Java",
            compile: Some(CommandSpec::new("javac").arg(&name)),
            run: CommandSpec::new("java").arg(stem),
            cwd,
        })
    } else if let Some(stem) = name.strip_suffix(".cpp") {
        let artifact = artifact_path(stem);
        Ok(RunPlan {
            language: "C++",
            compile: Some(
                CommandSpec::new("g++")
                    .arg(&name)
                    .arg("-o")
                    .arg(artifact.display().to_string()),
            ),
            run: CommandSpec::new(artifact.display().to_string()),
            cwd,
        })
    } else if name.ends_with(".py") {
        Ok(RunPlan {
            language: "Python",
            compile: None,
            run: CommandSpec::new("python").arg(&name),
            cwd,
        })
    } else {
        Err(RunError::Unsupported(name))
    }
}
