//! Console lifecycle intents from the UI layer.

use crate::error::ConsoleError;
use crate::services::console::ConsoleId;
use crate::Editor;

/// Operator submitted a line in the console's input field.
pub fn console_send(editor: &Editor, console: ConsoleId, line: &str) -> Result<(), ConsoleError> {
    editor.consoles().send(console, line)
}

/// Operator dismissed the console window; kills the process if still alive.
pub fn console_closed(editor: &Editor, console: ConsoleId) {
    editor.consoles().close(console);
}
