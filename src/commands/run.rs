//! The "run current file" intent: recipe resolution, then compile and
//! launch on a background thread. The call itself returns immediately;
//! every outcome - console opened, compile diagnostics, launch failure -
//! arrives at the UI as an event.

use std::sync::Arc;
use std::thread;

use crate::error::RunError;
use crate::events::UiEvent;
use crate::services::{pipeline, runner};
use crate::Editor;

pub fn run_current_file(editor: &Editor) {
    let Some(source) = editor.workspace().current_file() else {
        editor.sink().emit(UiEvent::Dialog {
            title: "Run".into(),
            message: "Please save the file first!".into(),
        });
        return;
    };

    let plan = match runner::resolve(&source) {
        Ok(plan) => plan,
        Err(err) => {
            editor.sink().emit(UiEvent::Dialog {
                title: "Run".into(),
                message: err.to_string(),
            });
            return;
        }
    };

    let title = source.file_name().to_string();
    let consoles = Arc::clone(editor.consoles());
    let sink = Arc::clone(editor.sink());

    // Compile and launch block only this thread, never the UI.
    thread::spawn(move || match pipeline::execute(&plan) {
        Ok(process) => {
            // The manager announces the console itself, before its output
            // pump starts.
            consoles.open(&title, process);
        }
        Err(RunError::CompileFailed {
            language,
            diagnostics,
            ..
        }) => {
            sink.emit(UiEvent::CompileDiagnostics {
                title: format!("{language} Compilation Error"),
                output: diagnostics,
            });
        }
        Err(err) => {
            sink.emit(UiEvent::Dialog {
                title: "Run".into(),
                message: err.to_string(),
            });
        }
    });
}
