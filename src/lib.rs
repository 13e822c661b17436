//! Backend core of the scribepad editor: the build-and-run pipeline, live
//! process consoles, and the auto-save daemon.
//!
//! The crate deliberately knows nothing about widgets. Everything the display
//! layer must show travels through an [`EventSink`] as a [`UiEvent`], and the
//! only way back into live text is [`BufferHost::snapshot`], which the host
//! marshals onto its own UI thread. Background threads here never touch UI
//! state directly.

pub mod commands;
pub mod error;
pub mod events;
pub mod models;
pub mod services;

use std::sync::Arc;

pub use error::{ConsoleError, RunError};
pub use events::{ChannelSink, EventSink, UiEvent};
pub use services::console::{ConsoleId, ConsoleManager};
pub use services::workspace::{BufferHost, TabId, Workspace};

use services::autosave::AutoSave;

/// Shared editor state handed to every command handler.
///
/// Construction wires the workspace, the console manager, and the auto-save
/// daemon to the caller-supplied event sink and buffer host. The auto-save
/// timer thread starts immediately (disabled until toggled on).
pub struct Editor {
    workspace: Arc<Workspace>,
    consoles: Arc<ConsoleManager>,
    autosave: Arc<AutoSave>,
    sink: Arc<dyn EventSink>,
}

impl Editor {
    pub fn new(sink: Arc<dyn EventSink>, buffers: Arc<dyn BufferHost>) -> Self {
        let workspace = Arc::new(Workspace::new());
        let consoles = ConsoleManager::new(Arc::clone(&sink));
        let autosave = AutoSave::new(
            Arc::clone(&workspace),
            buffers,
            Arc::clone(&sink),
        );
        autosave.start();

        Editor {
            workspace,
            consoles,
            autosave,
            sink,
        }
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    pub fn consoles(&self) -> &Arc<ConsoleManager> {
        &self.consoles
    }

    pub(crate) fn autosave(&self) -> &Arc<AutoSave> {
        &self.autosave
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Kill any processes still attached to open consoles. Called by the
    /// host on application exit.
    pub fn shutdown(&self) {
        log::info!("shutting down - closing live consoles");
        self.consoles.close_all();
    }
}
