use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use super::errors::LensError;

/// Events that we care about for the watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Modified(PathBuf),
    Deleted(PathBuf),
}

/// Watches one file through its parent directory
///
/// Editors that save by rename replace the inode, so the directory is watched
/// and events are filtered down to the target file name.
pub struct FileSystemWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<Result<Event, notify::Error>>,
    target: PathBuf,
}

impl FileSystemWatcher {
    /// Create a new watcher for `path`
    pub fn new(path: &Path) -> Result<Self, LensError> {
        let target = path.canonicalize()?;
        let parent = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |event| {
            let _ = tx.send(event);
        })?;
        watcher.watch(&parent, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            target,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Drain pending events for the target (non-blocking)
    pub fn check_events(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();

        while let Ok(result) = self.rx.try_recv() {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("watch error: {}", e);
                    continue;
                }
            };

            if !event.paths.iter().any(|p| self.is_target(p)) {
                continue;
            }

            match event.kind {
                EventKind::Create(_) => events.push(FileEvent::Modified(self.target.clone())),
                EventKind::Modify(modify_kind) => {
                    use notify::event::ModifyKind;
                    match modify_kind {
                        ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Name(_) => {
                            events.push(FileEvent::Modified(self.target.clone()))
                        }
                        _ => {} // Ignore metadata changes
                    }
                }
                EventKind::Remove(_) => events.push(FileEvent::Deleted(self.target.clone())),
                _ => {}
            }
        }

        events.dedup();
        events
    }

    fn is_target(&self, path: &Path) -> bool {
        path == self.target || path.file_name() == self.target.file_name()
    }
}
