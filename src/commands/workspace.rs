//! Tab and auto-save intents from the UI layer. These keep the workspace's
//! tracked set in step with the host's open tabs.

use std::path::PathBuf;

use crate::services::workspace::TabId;
use crate::Editor;

pub fn tab_opened(editor: &Editor, title: &str, path: Option<PathBuf>) -> TabId {
    editor.workspace().open_tab(title, path)
}

pub fn tab_closed(editor: &Editor, tab: TabId) {
    editor.workspace().close_tab(tab);
}

pub fn tab_activated(editor: &Editor, tab: TabId) {
    editor.workspace().set_active(tab);
}

/// Save-as (or first save) bound the tab to a file.
pub fn tab_saved_as(editor: &Editor, tab: TabId, path: PathBuf) {
    editor.workspace().assign_path(tab, path);
}

/// Takes effect on the next timer tick, which may be up to one interval
/// away.
pub fn toggle_auto_save(editor: &Editor, enabled: bool) {
    editor.autosave().set_enabled(enabled);
}
