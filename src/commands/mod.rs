/// Commands module
/// Discrete user intents as plain handler functions over explicit editor
/// state; the UI layer calls these instead of wiring per-control listeners.

mod console;
mod run;
mod workspace;

pub use console::{console_closed, console_send};
pub use run::run_current_file;
pub use workspace::{
    tab_activated, tab_closed, tab_opened, tab_saved_as, toggle_auto_save,
};
