//! Per-page main content resolution.
//!
//! Most pages get a generic placeholder; the home and stats pages splice
//! markup out of their legacy documents. Adding a special page means adding
//! a case here: this module bridges hand-authored pages into the component
//! system and is not meant to generalize.

use crate::compiler::legacy;
use crate::config::SiteConfig;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Main content area markup plus the page's inline script block.
#[derive(Debug, Default)]
pub struct PageContent {
    /// Markup for the `{{PAGE_CONTENT}}` token
    pub markup: String,
    /// Markup for the `{{PAGE_SCRIPTS}}` token
    pub scripts: String,
}

/// Fixed header block for the stats page.
const STATS_HEADER: &str = r#"<div class="main-container">
    <div class="page-header">
        <h1>Statistiques en temps réel</h1>
        <p>Découvrez l'activité de la communauté Mapikids</p>
    </div>
</div>"#;

/// CDN script tags for the stats page (React + Chart.js + Babel + Supabase).
const STATS_EXTERNAL_SCRIPTS: &str = r#"<script src="https://unpkg.com/react@18/umd/react.production.min.js"></script>
<script src="https://unpkg.com/react-dom@18/umd/react-dom.production.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.js"></script>
<script src="https://unpkg.com/@babel/standalone/babel.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/@supabase/supabase-js@2"></script>"#;

/// Back-to-home footer link for the stats page.
const STATS_FOOTER_LINKS: &str = r#"<span style="margin: 0 0.5rem;">|</span>
<a href="/">← Retour à l'accueil</a>"#;

/// Produce the main content for a page key.
///
/// A legacy document that cannot be read is a per-page error; a document
/// that reads but misses an expected construct degrades to empty content
/// with a warning (see [`legacy`]).
pub fn resolve(key: &str, config: &SiteConfig) -> Result<PageContent> {
    match key {
        "index.html" => home_content(&config.build.legacy.home),
        "stats.html" => stats_content(&config.build.legacy.stats),
        _ => Ok(PageContent {
            markup: format!(
                r#"<div class="main-container"><p>Contenu de {key} sera ajouté ici</p></div>"#
            ),
            scripts: String::new(),
        }),
    }
}

/// Interior of the first `<style>` element of the legacy home document, for
/// the `{{GLOBAL_STYLES}}` token shared by every page.
pub fn global_styles(config: &SiteConfig) -> Result<String> {
    let (doc, origin) = read_legacy(&config.build.legacy.home)?;
    Ok(legacy::global_styles(&doc, &origin))
}

/// External CDN scripts for the `{{EXTERNAL_SCRIPTS}}` token.
pub fn external_scripts(key: &str) -> &'static str {
    match key {
        "stats.html" => STATS_EXTERNAL_SCRIPTS,
        _ => "",
    }
}

/// Page-specific links for the footer fragment's `{{FOOTER_EXTRA_LINKS}}`
/// token.
pub fn footer_links(key: &str) -> &'static str {
    match key {
        "stats.html" => STATS_FOOTER_LINKS,
        _ => "",
    }
}

fn home_content(path: &Path) -> Result<PageContent> {
    let (doc, origin) = read_legacy(path)?;
    Ok(PageContent {
        markup: legacy::home_body(&doc, &origin),
        scripts: legacy::home_scripts(&doc, &origin),
    })
}

fn stats_content(path: &Path) -> Result<PageContent> {
    let (doc, origin) = read_legacy(path)?;
    let tail = legacy::stats_root_tail(&doc, &origin);
    Ok(PageContent {
        markup: format!("{STATS_HEADER}\n<div id=\"root\"></div>\n{tail}"),
        scripts: legacy::stats_scripts(&doc, &origin),
    })
}

fn read_legacy(path: &Path) -> Result<(String, String)> {
    let doc = fs::read_to_string(path)
        .with_context(|| format!("failed to read legacy document {}", path.display()))?;
    Ok((doc, path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_legacy(dir: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.legacy.home = dir.join("index.html");
        config.build.legacy.stats = dir.join("stats.html");
        config
    }

    #[test]
    fn test_default_placeholder_names_page() {
        let config = SiteConfig::default();
        let content = resolve("carte.html", &config).unwrap();
        assert!(content.markup.contains("Contenu de carte.html"));
        assert!(content.scripts.is_empty());
    }

    #[test]
    fn test_missing_legacy_home_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_legacy(dir.path());
        assert!(resolve("index.html", &config).is_err());
    }

    #[test]
    fn test_stats_content_assembles_header_and_mount_point() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("stats.html"),
            "<body><div id=\"root\"></div><script type=\"text/babel\">const x = 1;</script></body>",
        )
        .unwrap();

        let config = config_with_legacy(dir.path());
        let content = resolve("stats.html", &config).unwrap();
        assert!(content.markup.contains("Statistiques en temps réel"));
        assert!(content.markup.contains(r#"<div id="root"></div>"#));
        assert!(content.scripts.contains("const x = 1;"));
    }

    #[test]
    fn test_external_scripts_only_for_stats() {
        assert!(external_scripts("stats.html").contains("chart.js"));
        assert_eq!(external_scripts("index.html"), "");
        assert_eq!(external_scripts("carte.html"), "");
    }

    #[test]
    fn test_footer_links_only_for_stats() {
        assert!(footer_links("stats.html").contains("Retour"));
        assert_eq!(footer_links("index.html"), "");
    }
}
