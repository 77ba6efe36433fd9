//! Output tree management and static asset copying.

use crate::config::SiteConfig;
use crate::log;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Remove and recreate the output directory.
///
/// Every build regenerates the full tree; stale files from previous builds
/// never survive.
pub fn clear_output(output: &Path) -> Result<()> {
    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;
    Ok(())
}

/// Write a composed page at the path derived from its key, creating
/// intermediate directories as needed.
pub fn write_page(output: &Path, key: &str, page: &str) -> Result<()> {
    let dest = output.join(key);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, page).with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(())
}

/// Copy the configured asset files from the project root into the output
/// root. Assets that do not exist are skipped without error.
pub fn copy_assets(config: &SiteConfig) -> Result<()> {
    let root = config.get_root();
    for name in &config.build.assets {
        let source = root.join(name);
        if !source.exists() {
            continue;
        }
        fs::copy(&source, config.build.output.join(name))
            .with_context(|| format!("failed to copy asset {name}"))?;
        log!("assets"; "{name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_output_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dist");
        fs::create_dir_all(output.join("old")).unwrap();
        fs::write(output.join("old/stale.html"), "stale").unwrap();

        clear_output(&output).unwrap();
        assert!(output.exists());
        assert!(!output.join("old").exists());
    }

    #[test]
    fn test_clear_output_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dist");
        clear_output(&output).unwrap();
        assert!(output.is_dir());
    }

    #[test]
    fn test_write_page_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), "sub/page.html", "<html></html>").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("sub/page.html")).unwrap(),
            "<html></html>"
        );
    }

    #[test]
    fn test_copy_assets_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("favicon.ico"), "icon").unwrap();

        let mut config = SiteConfig::default();
        config.set_root(root);
        config.build.output = root.join("dist");
        config.build.assets = vec!["favicon.ico".into(), "missing.png".into()];
        fs::create_dir_all(&config.build.output).unwrap();

        copy_assets(&config).unwrap();
        assert!(config.build.output.join("favicon.ico").exists());
        assert!(!config.build.output.join("missing.png").exists());
    }
}
