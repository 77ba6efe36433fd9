//! File system watcher for live rebuilds.
//!
//! Monitors the source tree, the two legacy documents and the config file,
//! and reruns the full build on each debounced batch of changes. Rebuilds
//! execute synchronously on the event-loop thread: a new batch cannot start
//! a second build while one is in flight, so rebuilds are single-flight by
//! construction.

use crate::{build::build_site, config::SiteConfig, log, logger::WatchStatus};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path as relative to root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: HashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: HashSet::new(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Watcher Setup
// =============================================================================

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let watched = [
        (&config.build.source, RecursiveMode::Recursive),
        (&config.build.legacy.home, RecursiveMode::NonRecursive),
        (&config.build.legacy.stats, RecursiveMode::NonRecursive),
        (&config.config_path, RecursiveMode::NonRecursive),
    ];

    let root = config.get_root();
    let mut names = Vec::new();

    for (path, mode) in watched {
        if path.exists() {
            watcher
                .watch(path, mode)
                .with_context(|| format!("Failed to watch {}", path.display()))?;
            names.push(rel_path(path, root));
        }
    }

    log!("watch"; "watching: {}", names.join(", "));
    eprintln!(); // Blank line to separate init logs from change events
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
}

// =============================================================================
// Rebuild
// =============================================================================

/// Run a full rebuild for a batch of changed paths.
/// Returns true if successful (for cooldown tracking).
fn rebuild(config: &SiteConfig, changed: &[PathBuf], status: &mut WatchStatus) -> bool {
    let root = config.get_root();
    let trigger = changed
        .iter()
        .map(|path| rel_path(path, root))
        .collect::<Vec<_>>()
        .join(", ");

    log!("watch"; "{trigger} changed, rebuilding...");
    match build_site(config) {
        Ok(()) => {
            status.success(&format!("rebuilt ({trigger})"));
            true
        }
        Err(err) => {
            status.error(&format!("rebuild failed ({trigger})"), &format!("{err:#}"));
            false
        }
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and live rebuild.
pub fn watch_for_changes_blocking(config: &'static SiteConfig) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, config)?;

    let mut debouncer = Debouncer::new();
    let mut status = WatchStatus::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                if rebuild(config, &debouncer.take(), &mut status) {
                    debouncer.mark_rebuild();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            // Other cases: irrelevant events, timeout without ready, etc.
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("/p/index.html.swp")));
        assert!(is_temp_file(Path::new("/p/index.html~")));
        assert!(is_temp_file(Path::new("/p/.index.html.kate-swp")));
        assert!(!is_temp_file(Path::new("/p/index.html")));
        assert!(!is_temp_file(Path::new("/p/pages.json")));
    }

    #[test]
    fn test_debouncer_filters_temp_files() {
        let mut debouncer = Debouncer::new();
        debouncer.add(Event::new(EventKind::Any).add_path(PathBuf::from("/p/a.swp")));
        assert!(debouncer.pending.is_empty());

        debouncer.add(Event::new(EventKind::Any).add_path(PathBuf::from("/p/a.html")));
        assert_eq!(debouncer.pending.len(), 1);
    }

    #[test]
    fn test_debouncer_not_ready_before_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add(Event::new(EventKind::Any).add_path(PathBuf::from("/p/a.html")));
        // Window just opened; the debounce interval has not elapsed.
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_debouncer_take_drains() {
        let mut debouncer = Debouncer::new();
        debouncer.add(Event::new(EventKind::Any).add_path(PathBuf::from("/p/a.html")));
        let taken = debouncer.take();
        assert_eq!(taken.len(), 1);
        assert!(debouncer.pending.is_empty());
        assert!(debouncer.last_event.is_none());
    }

    #[test]
    fn test_debouncer_timeout_depends_on_pending() {
        let mut debouncer = Debouncer::new();
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));

        debouncer.add(Event::new(EventKind::Any).add_path(PathBuf::from("/p/a.html")));
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));
    }
}
