//! Fragment loading with a per-build cache.

use crate::log;
use std::{collections::HashMap, fs, path::PathBuf};

/// Caches fragment text by file name for the lifetime of one build run.
///
/// The store is constructed inside each build invocation and dropped when it
/// returns, so watch-mode rebuilds always reread fragments from disk. There
/// is no invalidation: a fragment changed mid-run after being cached is not
/// re-read until the next build.
pub struct FragmentStore {
    dir: PathBuf,
    cache: HashMap<String, String>,
}

impl FragmentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    /// Fragment text by file name.
    ///
    /// A fragment that cannot be read logs a warning and resolves to the
    /// empty string; the empty result is cached too, so the warning fires
    /// once per run rather than once per page.
    pub fn get(&mut self, name: &str) -> &str {
        if !self.cache.contains_key(name) {
            let path = self.dir.join(name);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    log!("warn"; "fragment {} unreadable: {err}", path.display());
                    String::new()
                }
            };
            self.cache.insert(name.to_string(), text);
        }
        &self.cache[name]
    }
}
