//! Site building orchestration.
//!
//! One build = load manifest → clear output → compose every page → copy
//! assets. Pages build sequentially and independently: a failure in one is
//! logged and skipped, the rest still build. Only a manifest that cannot be
//! loaded, or a run where not a single page succeeded, fails the build.

use crate::{
    compiler::{self, assets, fragments::FragmentStore},
    config::SiteConfig,
    log,
    manifest::PageManifest,
};
use anyhow::{Context, Result, bail};
use std::path::Path;
use walkdir::WalkDir;

/// Build the entire site.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    // Manifest problems are fatal and must leave the previous output
    // intact, so the load happens before the output tree is cleared.
    let manifest = PageManifest::load(&config.build.manifest).with_context(|| {
        format!(
            "failed to load page manifest {}",
            config.build.manifest.display()
        )
    })?;
    log!("build"; "{} pages configured", manifest.len());

    assets::clear_output(&config.build.output)?;

    // Fragment cache scoped to this invocation: watch-mode rebuilds always
    // start from a cold cache.
    let mut fragments = FragmentStore::new(&config.build.components);
    let mut built = 0usize;

    for (key, entry) in manifest.pages() {
        match compiler::build_page(key, entry, config, &mut fragments) {
            Ok(()) => {
                log!("build"; "{key}");
                built += 1;
            }
            Err(err) => log!("error"; "{key}: {err:#}"),
        }
    }

    if let Err(err) = assets::copy_assets(config) {
        log!("error"; "assets: {err:#}");
    }

    if built == 0 && !manifest.is_empty() {
        bail!("no pages were built");
    }

    log_build_result(&config.build.output);
    Ok(())
}

/// Log build result based on output directory contents
fn log_build_result(output: &Path) {
    let file_count = WalkDir::new(output)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count();

    if file_count == 0 {
        log!("warn"; "output is empty, check the page manifest");
    } else {
        log!("build"; "{file_count} files in {}", output.display());
    }
}
