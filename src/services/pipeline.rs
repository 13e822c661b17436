//! Process pipeline: runs a plan's compile step to completion, then launches
//! the run command and hands back live stream handles.
//!
//! Both steps go through a PTY, which merges stderr into stdout (the console
//! shows one interleaved stream) and makes interpreters flush interactive
//! prompts. Callers invoke [`execute`] from a background thread; nothing
//! here may run on the UI thread.

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::error::RunError;
use crate::models::CompileResult;
use crate::services::runner::{CommandSpec, RunPlan};

const CONSOLE_PTY_SIZE: PtySize = PtySize {
    rows: 24,
    cols: 80,
    pixel_width: 0,
    pixel_height: 0,
};

/// A launched run command with its stream handles. Exclusively owned by the
/// console session that takes it over; dropping it closes the PTY and the
/// process loses its terminal.
pub struct RunningProcess {
    pub(crate) master: Box<dyn MasterPty + Send>,
    pub(crate) writer: Box<dyn Write + Send>,
    pub(crate) reader: Box<dyn Read + Send>,
    pub(crate) child: Box<dyn Child + Send + Sync>,
}

impl fmt::Debug for RunningProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The stream handles carry nothing printable; the pid identifies
        // the process.
        f.debug_struct("RunningProcess")
            .field("pid", &self.child.process_id())
            .finish_non_exhaustive()
    }
}

/// Run the plan: compile (if the recipe has a compile step), then launch.
/// A failed compile returns `CompileFailed` and never attempts the run.
pub fn execute(plan: &RunPlan) -> Result<RunningProcess, RunError> {
    if let Some(step) = &plan.compile {
        log::info!("compiling with `{}` in {}", step.program, plan.cwd.display());
        let result = compile(step, &plan.cwd)?;
        if !result.succeeded {
            return Err(RunError::CompileFailed {
                language: plan.language,
                exit_code: result.exit_code,
                diagnostics: result.output,
            });
        }
    }

    log::info!("launching `{}` in {}", plan.run.program, plan.cwd.display());
    launch(&plan.run, &plan.cwd)
}

/// Run one command to completion, capturing its merged output text.
fn compile(step: &CommandSpec, cwd: &Path) -> Result<CompileResult, RunError> {
    let launch_err = |message: String| RunError::Launch {
        program: step.program.clone(),
        message,
    };

    let pair = native_pty_system()
        .openpty(CONSOLE_PTY_SIZE)
        .map_err(|e| launch_err(e.to_string()))?;

    let mut cmd = CommandBuilder::new(&step.program);
    cmd.args(&step.args);
    cmd.cwd(cwd);

    let mut child = pair
        .slave
        .spawn_command(cmd)
        .map_err(|e| launch_err(e.to_string()))?;
    // Drop our slave handle so the master sees EOF once the compiler exits.
    drop(pair.slave);

    let mut reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| launch_err(e.to_string()))?;

    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
            // Linux masters report EIO instead of a clean EOF.
            Err(_) => break,
        }
    }

    let status = child.wait().map_err(|e| launch_err(e.to_string()))?;
    let output = String::from_utf8_lossy(&raw).replace("\r\n", "\n");
    Ok(CompileResult {
        succeeded: status.success(),
        output,
        exit_code: status.exit_code(),
    })
}

fn launch(run: &CommandSpec, cwd: &Path) -> Result<RunningProcess, RunError> {
    let launch_err = |message: String| RunError::Launch {
        program: run.program.clone(),
        message,
    };

    let pair = native_pty_system()
        .openpty(CONSOLE_PTY_SIZE)
        .map_err(|e| launch_err(e.to_string()))?;

    let mut cmd = CommandBuilder::new(&run.program);
    cmd.args(&run.args);
    cmd.cwd(cwd);

    let child = pair
        .slave
        .spawn_command(cmd)
        .map_err(|e| launch_err(e.to_string()))?;
    drop(pair.slave);

    // The console echoes operator input itself; stop the line discipline
    // from echoing it a second time.
    #[cfg(unix)]
    disable_echo(pair.master.as_ref());

    let reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| launch_err(e.to_string()))?;
    let writer = pair
        .master
        .take_writer()
        .map_err(|e| launch_err(e.to_string()))?;

    Ok(RunningProcess {
        master: pair.master,
        writer,
        reader,
        child,
    })
}

#[cfg(unix)]
fn disable_echo(master: &dyn MasterPty) {
    let Some(fd) = master.as_raw_fd() else {
        return;
    };
    unsafe {
        let mut term: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &mut term) == 0 {
            term.c_lflag &= !(libc::ECHO | libc::ECHONL);
            let _ = libc::tcsetattr(fd, libc::TCSANOW, &term);
        }
    }
}
