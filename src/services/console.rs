//! Console sessions: the live, bidirectional view over one running process.
//!
//! Each session exclusively owns its process. A dedicated reader thread
//! pumps the merged output stream into the event sink chunk by chunk;
//! operator lines go to the child's stdin via [`ConsoleManager::send`] and
//! are echoed inline. When the process exits, the session appends one
//! finalization line with the exit code and stops accepting input. Closing
//! the console kills the process if it is still alive.

use parking_lot::Mutex;
use portable_pty::{Child, MasterPty};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use crate::error::ConsoleError;
use crate::events::{EventSink, UiEvent};
use crate::services::pipeline::RunningProcess;

pub type ConsoleId = u32;

struct ConsoleSession {
    // Keeps the PTY alive; dropping it force-closes the streams.
    _master: Box<dyn MasterPty + Send>,
    // Own lock so a write stalled on a full terminal buffer never holds
    // up the session map (close must stay reachable to kill the child).
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    // Taken by the reader thread when the process exits naturally.
    child: Option<Box<dyn Child + Send + Sync>>,
    finished: bool,
}

/// Console manager - owns all open sessions, keyed by console id.
pub struct ConsoleManager {
    sessions: Mutex<HashMap<ConsoleId, ConsoleSession>>,
    next_id: AtomicU32,
    sink: Arc<dyn EventSink>,
}

impl ConsoleManager {
    pub fn new(sink: Arc<dyn EventSink>) -> Arc<Self> {
        Arc::new(ConsoleManager {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU32::new(1),
            sink,
        })
    }

    /// Take ownership of a freshly launched process and start its output
    /// pump. Output chunks are emitted in read order; a partial line is
    /// flushed as soon as it arrives.
    pub fn open(self: &Arc<Self>, title: &str, process: RunningProcess) -> ConsoleId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let RunningProcess {
            master,
            writer,
            mut reader,
            child,
        } = process;

        self.sessions.lock().insert(
            id,
            ConsoleSession {
                _master: master,
                writer: Arc::new(Mutex::new(writer)),
                child: Some(child),
                finished: false,
            },
        );

        // Announce the console before the pump starts, so no output chunk
        // can reach the display ahead of the window it belongs to.
        self.sink.emit(UiEvent::ConsoleOpened {
            console: id,
            title: title.to_string(),
        });

        let manager = Arc::clone(self);
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        manager.sink.emit(UiEvent::ConsoleOutput {
                            console: id,
                            chunk: String::from_utf8_lossy(&buf[..n]).into_owned(),
                        });
                    }
                    // EOF on Linux masters surfaces as EIO; any other read
                    // failure also ends the pump, keeping what was captured.
                    Err(_) => break,
                }
            }
            manager.finalize(id);
        });

        id
    }

    /// Reader thread epilogue: reap the child and append the finalization
    /// line. If the session was already closed by the operator there is
    /// nothing left to show.
    fn finalize(&self, id: ConsoleId) {
        let child = {
            let mut sessions = self.sessions.lock();
            match sessions.get_mut(&id) {
                Some(session) => match session.child.take() {
                    Some(child) => child,
                    None => return,
                },
                None => return,
            }
        };

        let mut child = child;
        let exit_code = match child.wait() {
            Ok(status) => status.exit_code(),
            Err(err) => {
                log::warn!("failed to reap console {id} child: {err}");
                1
            }
        };

        {
            let mut sessions = self.sessions.lock();
            match sessions.get_mut(&id) {
                Some(session) => session.finished = true,
                None => return,
            }
        }

        self.sink.emit(UiEvent::ConsoleOutput {
            console: id,
            chunk: format!("\n[Process finished with exit code {exit_code}]\n"),
        });
        self.sink.emit(UiEvent::ConsoleFinished {
            console: id,
            exit_code,
        });
    }

    /// Forward one operator line to the process's stdin (newline-terminated)
    /// and echo it to the display. Both happen before this returns. Sends to
    /// an unknown or finished console are no-ops.
    pub fn send(&self, id: ConsoleId, line: &str) -> Result<(), ConsoleError> {
        let writer = {
            let sessions = self.sessions.lock();
            let Some(session) = sessions.get(&id) else {
                return Ok(());
            };
            if session.finished {
                return Ok(());
            }
            Arc::clone(&session.writer)
        };

        let input_err = |err: std::io::Error| ConsoleError::Input {
            console: id,
            message: err.to_string(),
        };
        {
            let mut writer = writer.lock();
            writer.write_all(line.as_bytes()).map_err(input_err)?;
            writer.write_all(b"\n").map_err(input_err)?;
            writer.flush().map_err(input_err)?;
        }

        self.sink.emit(UiEvent::ConsoleOutput {
            console: id,
            chunk: format!("{line}\n"),
        });
        Ok(())
    }

    pub fn is_open(&self, id: ConsoleId) -> bool {
        self.sessions.lock().contains_key(&id)
    }

    /// Operator dismissed the console: kill the process if it is still
    /// alive and drop the session. Safe to call repeatedly.
    pub fn close(&self, id: ConsoleId) {
        let session = self.sessions.lock().remove(&id);
        if let Some(mut session) = session {
            if let Some(mut child) = session.child.take() {
                kill_child(child.as_mut());
                // Wait to prevent zombies; the kill above guarantees exit.
                let _ = child.wait();
            }
            // Dropping the session drops the master, which force-closes the
            // streams and unblocks the reader thread.
        }
    }

    /// Close every session - used during shutdown.
    pub fn close_all(&self) {
        let ids: Vec<ConsoleId> = self.sessions.lock().keys().copied().collect();
        for id in ids {
            self.close(id);
        }
    }
}

impl Drop for ConsoleManager {
    fn drop(&mut self) {
        self.close_all();
    }
}

#[cfg(unix)]
fn kill_child(child: &mut (dyn Child + Send + Sync)) {
    // The PTY spawn made the child a session leader, so its pid doubles as
    // the process group: kill the group to take descendants down with it.
    if let Some(pid) = child.process_id() {
        unsafe {
            // SIGTERM first for graceful shutdown
            libc::kill(-(pid as i32), libc::SIGTERM);
            thread::sleep(std::time::Duration::from_millis(100));
            // SIGKILL if still running
            libc::kill(-(pid as i32), libc::SIGKILL);
        }
    } else {
        let _ = child.kill();
    }
}

#[cfg(windows)]
fn kill_child(child: &mut (dyn Child + Send + Sync)) {
    let _ = child.kill();
}
