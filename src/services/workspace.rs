//! Tab bookkeeping shared between the UI layer and the background services.
//!
//! One owned record per tab, keyed by a stable [`TabId`]. The workspace
//! never holds live text; reading a buffer goes through [`BufferHost`],
//! whose implementation marshals the read onto whatever thread owns the
//! widget and blocks the caller until the snapshot is taken.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::models::SourceFile;

pub type TabId = u32;

/// Point-in-time access to tab text, implemented by the UI layer.
pub trait BufferHost: Send + Sync {
    /// Copy of the tab's current text, or `None` if the tab no longer
    /// exists on the host side.
    fn snapshot(&self, tab: TabId) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct TabRecord {
    pub title: String,
    /// Backing file, if the tab was ever saved. Untitled tabs stay `None`
    /// and are excluded from run and auto-save.
    pub path: Option<PathBuf>,
}

pub struct Workspace {
    tabs: Mutex<HashMap<TabId, TabRecord>>,
    active: Mutex<Option<TabId>>,
    next_id: AtomicU32,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace {
            tabs: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            next_id: AtomicU32::new(1),
        }
    }

    /// Register a tab and make it active.
    pub fn open_tab(&self, title: &str, path: Option<PathBuf>) -> TabId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.tabs.lock().insert(
            id,
            TabRecord {
                title: title.to_string(),
                path,
            },
        );
        *self.active.lock() = Some(id);
        id
    }

    pub fn close_tab(&self, id: TabId) {
        self.tabs.lock().remove(&id);
        let mut active = self.active.lock();
        if *active == Some(id) {
            *active = None;
        }
    }

    pub fn set_active(&self, id: TabId) {
        if self.tabs.lock().contains_key(&id) {
            *self.active.lock() = Some(id);
        }
    }

    /// Bind a tab to a file after save/save-as; the tab joins the auto-save
    /// tracked set from the next tick on.
    pub fn assign_path(&self, id: TabId, path: PathBuf) {
        if let Some(record) = self.tabs.lock().get_mut(&id) {
            record.path = Some(path);
        }
    }

    /// The active tab's backing file, if it has one. `None` means there is
    /// nothing runnable (no tab, or an unsaved buffer).
    pub fn current_file(&self) -> Option<SourceFile> {
        let active = (*self.active.lock())?;
        let tabs = self.tabs.lock();
        let path = tabs.get(&active)?.path.clone()?;
        Some(SourceFile::new(path))
    }

    /// Auto-save's tracked set: every open tab with a backing path.
    pub fn saved_tabs(&self) -> Vec<(TabId, PathBuf)> {
        self.tabs
            .lock()
            .iter()
            .filter_map(|(id, record)| record.path.clone().map(|path| (*id, path)))
            .collect()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_file_follows_the_active_tab() {
        let ws = Workspace::new();
        let a = ws.open_tab("a.py", Some(PathBuf::from("/w/a.py")));
        let _b = ws.open_tab("Untitled", None);
        assert!(ws.current_file().is_none());

        ws.set_active(a);
        assert_eq!(ws.current_file().unwrap().path, PathBuf::from("/w/a.py"));
    }

    #[test]
    fn untitled_tabs_are_not_tracked() {
        let ws = Workspace::new();
        ws.open_tab("Untitled", None);
        let saved = ws.open_tab("b.cpp", Some(PathBuf::from("/w/b.cpp")));
        let tracked = ws.saved_tabs();
        assert_eq!(tracked, vec![(saved, PathBuf::from("/w/b.cpp"))]);
    }

    #[test]
    fn save_as_joins_the_tracked_set() {
        let ws = Workspace::new();
        let id = ws.open_tab("Untitled", None);
        assert!(ws.saved_tabs().is_empty());

        ws.assign_path(id, PathBuf::from("/w/new.java"));
        assert_eq!(ws.saved_tabs(), vec![(id, PathBuf::from("/w/new.java"))]);
        assert_eq!(ws.current_file().unwrap().file_name(), "new.java");
    }

    #[test]
    fn closing_a_tab_clears_it_everywhere() {
        let ws = Workspace::new();
        let id = ws.open_tab("a.py", Some(PathBuf::from("/w/a.py")));
        ws.close_tab(id);
        assert!(ws.current_file().is_none());
        assert!(ws.saved_tabs().is_empty());
    }
}
