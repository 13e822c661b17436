//! Display-bound events and the hand-off boundary to the UI owner thread.
//!
//! Background threads (compile/launch, console readers, auto-save) never
//! mutate UI state. They emit [`UiEvent`]s through an [`EventSink`]; the
//! host's single UI thread drains them and applies widget updates.

use serde::Serialize;
use std::sync::mpsc;
use std::sync::Arc;

use crate::services::console::ConsoleId;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Modal message: unsupported extension, launch failure, unsaved file.
    Dialog { title: String, message: String },
    /// Compiler diagnostics for the scrollable read-only panel.
    CompileDiagnostics { title: String, output: String },
    ConsoleOpened { console: ConsoleId, title: String },
    /// A chunk of merged process output (or an input echo), in arrival order.
    ConsoleOutput { console: ConsoleId, chunk: String },
    /// The process exited; input to this console is disabled from now on.
    ConsoleFinished { console: ConsoleId, exit_code: u32 },
    /// Status-bar text, e.g. auto-save feedback.
    StatusMessage { text: String },
}

impl UiEvent {
    /// JSON payload as the display layer's IPC consumes it.
    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Queued hand-off to whichever thread owns the display.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: UiEvent);
}

/// `EventSink` backed by an mpsc channel. The UI owner keeps the receiver
/// and drains it on its own thread; a disconnected receiver (UI shut down)
/// makes `emit` a no-op.
pub struct ChannelSink {
    tx: mpsc::Sender<UiEvent>,
}

impl ChannelSink {
    pub fn new() -> (Arc<Self>, mpsc::Receiver<UiEvent>) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(ChannelSink { tx }), rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: UiEvent) {
        let _ = self.tx.send(event);
    }
}
