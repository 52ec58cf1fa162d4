use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender, unbounded};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Keeps a file watcher alive and reports changes to one config file.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<()>,
    path: PathBuf,
}

impl ConfigWatcher {
    pub fn spawn(path: &Path) -> notify::Result<Self> {
        let (tx, rx) = unbounded::<()>();
        let mut watcher = notify::recommended_watcher(forward_changes(tx))?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;
        log::info!(target: "config", "watching {}", path.display());
        Ok(Self {
            _watcher: watcher,
            rx,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when at least one change arrived since the last call. Bursts of events
    /// from a single save collapse into one reload.
    pub fn take_changed(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

fn forward_changes(tx: Sender<()>) -> impl FnMut(notify::Result<notify::Event>) + Send + 'static {
    move |res| match res {
        Ok(event) => match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => {
                let _ = tx.send(());
            }
            _ => {}
        },
        Err(e) => log::warn!(target: "config", "watch error: {e}"),
    }
}
