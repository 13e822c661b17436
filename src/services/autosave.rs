//! Auto-save: a fixed-interval background persister for saved tabs.
//!
//! One long-lived thread sleeps for [`AUTO_SAVE_INTERVAL`], then runs a
//! tick. The enabled flag is read on every tick, so a toggle can take
//! effect up to one interval late - that staleness window is the contract,
//! not a bug. Auto-save is a background convenience: per-file I/O failures
//! are logged and skipped, never surfaced as dialogs, and never abort the
//! rest of the tick.

use chrono::Local;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::events::{EventSink, UiEvent};
use crate::services::workspace::{BufferHost, Workspace};

pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(10);

pub struct AutoSave {
    enabled: AtomicBool,
    workspace: Arc<Workspace>,
    buffers: Arc<dyn BufferHost>,
    sink: Arc<dyn EventSink>,
}

impl AutoSave {
    pub fn new(
        workspace: Arc<Workspace>,
        buffers: Arc<dyn BufferHost>,
        sink: Arc<dyn EventSink>,
    ) -> Arc<Self> {
        Arc::new(AutoSave {
            enabled: AtomicBool::new(false),
            workspace,
            buffers,
            sink,
        })
    }

    /// Start the timer thread. It runs for the life of the process; Rust
    /// threads do not block process exit, so no teardown is needed.
    pub fn start(self: &Arc<Self>) {
        let this = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(AUTO_SAVE_INTERVAL);
            this.tick();
        });
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// One pass over the tracked set: snapshot each saved tab's buffer and
    /// overwrite its backing file with the full content.
    pub fn tick(&self) {
        if !self.is_enabled() {
            return;
        }

        for (tab, path) in self.workspace.saved_tabs() {
            // The host may have dropped the tab between the set read and
            // the snapshot; skip it.
            let Some(text) = self.buffers.snapshot(tab) else {
                continue;
            };

            if let Err(err) = fs::write(&path, &text) {
                log::warn!("auto-save failed for {}: {err}", path.display());
                continue;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let time = Local::now().format("%H:%M:%S");
            self.sink.emit(UiEvent::StatusMessage {
                text: format!("Auto-saved {name} at {time}"),
            });
        }
    }
}
