//! Page composition: fragments + template + placeholder substitution.
//!
//! A page is a template with every placeholder token replaced by assembled
//! content. Substitution is textual: tokens are literal `{{NAME}}` markers
//! with no awareness of HTML structure.

pub mod assets;
pub mod content;
pub mod fragments;
pub mod legacy;

use crate::config::SiteConfig;
use crate::manifest::PageEntry;
use anyhow::{Context, Result};
use fragments::FragmentStore;
use std::{collections::HashMap, fs};

// ============================================================================
// Placeholder Registry
// ============================================================================

pub const HEAD_SEO: &str = "{{HEAD_SEO}}";
pub const NAV_COMPONENT: &str = "{{NAV_COMPONENT}}";
pub const DECORATIONS_COMPONENT: &str = "{{DECORATIONS_COMPONENT}}";
pub const PAGE_CONTENT: &str = "{{PAGE_CONTENT}}";
pub const FOOTER_COMPONENT: &str = "{{FOOTER_COMPONENT}}";
pub const MODAL_MENTIONS: &str = "{{MODAL_MENTIONS}}";
pub const EXTERNAL_SCRIPTS: &str = "{{EXTERNAL_SCRIPTS}}";
pub const GLOBAL_STYLES: &str = "{{GLOBAL_STYLES}}";
pub const PAGE_SCRIPTS: &str = "{{PAGE_SCRIPTS}}";

/// Registry tokens in application order. `PAGE_SCRIPTS` must come after
/// `PAGE_CONTENT`: the home page's content carries the residual script token.
pub const PLACEHOLDERS: &[&str] = &[
    HEAD_SEO,
    NAV_COMPONENT,
    DECORATIONS_COMPONENT,
    PAGE_CONTENT,
    FOOTER_COMPONENT,
    MODAL_MENTIONS,
    EXTERNAL_SCRIPTS,
    GLOBAL_STYLES,
    PAGE_SCRIPTS,
];

// Secondary tokens, filled inside their fragment before it joins the outer
// substitution pass.
pub const PAGE_TITLE: &str = "{{PAGE_TITLE}}";
pub const PAGE_DESCRIPTION: &str = "{{PAGE_DESCRIPTION}}";
pub const PAGE_OG_IMAGE: &str = "{{PAGE_OG_IMAGE}}";
pub const PAGE_URL: &str = "{{PAGE_URL}}";
pub const FOOTER_EXTRA_LINKS: &str = "{{FOOTER_EXTRA_LINKS}}";

/// Placeholder token → content string for one page.
pub type TokenMap = HashMap<&'static str, String>;

// ============================================================================
// Substitution
// ============================================================================

/// Replace every registry token with its mapped content.
///
/// Matching is literal (`str::replace`, so no metacharacter escaping) and
/// replaces *all* occurrences of each token. A token with no map entry is
/// replaced with the empty string, never left in the output.
pub fn substitute(template: &str, tokens: &TokenMap) -> String {
    PLACEHOLDERS.iter().fold(template.to_string(), |page, token| {
        page.replace(token, tokens.get(token).map_or("", String::as_str))
    })
}

// ============================================================================
// Page Composition
// ============================================================================

/// Compose one page and write it under the output root.
pub fn build_page(
    key: &str,
    entry: &PageEntry,
    config: &SiteConfig,
    fragments: &mut FragmentStore,
) -> Result<()> {
    let template_path = config.build.templates.join(&entry.template);
    let template = fs::read_to_string(&template_path)
        .with_context(|| format!("failed to read template {}", template_path.display()))?;

    let tokens = token_map(key, entry, config, fragments)?;
    let page = substitute(&template, &tokens);

    assets::write_page(&config.build.output, key, &page)
}

/// Assemble the full token map for one page.
fn token_map(
    key: &str,
    entry: &PageEntry,
    config: &SiteConfig,
    fragments: &mut FragmentStore,
) -> Result<TokenMap> {
    // Page metadata lands in the head fragment before it joins the outer pass.
    let head = fragments
        .get("head-seo.html")
        .replace(PAGE_TITLE, &entry.title)
        .replace(PAGE_DESCRIPTION, &entry.description)
        .replace(PAGE_OG_IMAGE, &entry.og_image)
        .replace(PAGE_URL, key);

    let footer = fragments
        .get("footer.html")
        .replace(FOOTER_EXTRA_LINKS, content::footer_links(key));

    let page_content = content::resolve(key, config)?;
    let styles = content::global_styles(config)?;

    let mut tokens = TokenMap::new();
    tokens.insert(HEAD_SEO, head);
    tokens.insert(NAV_COMPONENT, fragments.get("nav.html").to_string());
    tokens.insert(
        DECORATIONS_COMPONENT,
        fragments.get("decorations.html").to_string(),
    );
    tokens.insert(PAGE_CONTENT, page_content.markup);
    tokens.insert(FOOTER_COMPONENT, footer);
    tokens.insert(
        MODAL_MENTIONS,
        fragments.get("modal-mentions.html").to_string(),
    );
    tokens.insert(EXTERNAL_SCRIPTS, content::external_scripts(key).to_string());
    tokens.insert(GLOBAL_STYLES, styles);
    tokens.insert(PAGE_SCRIPTS, page_content.scripts);

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&'static str, &str)]) -> TokenMap {
        pairs
            .iter()
            .map(|(token, content)| (*token, content.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_replaces_all_occurrences() {
        // Regression: an earlier revision of this build replaced only the
        // first occurrence of each token.
        let template = "{{NAV_COMPONENT}} middle {{NAV_COMPONENT}} end {{NAV_COMPONENT}}";
        let result = substitute(template, &map(&[(NAV_COMPONENT, "<nav/>")]));
        assert_eq!(result, "<nav/> middle <nav/> end <nav/>");
    }

    #[test]
    fn test_substitute_unmapped_token_removed() {
        let template = "a{{GLOBAL_STYLES}}b";
        let result = substitute(template, &TokenMap::new());
        assert_eq!(result, "ab");
    }

    #[test]
    fn test_substitute_empty_content() {
        let template = "a{{PAGE_CONTENT}}b";
        let result = substitute(template, &map(&[(PAGE_CONTENT, "")]));
        assert_eq!(result, "ab");
    }

    #[test]
    fn test_substitute_token_free_template_untouched() {
        let template = "<html><body>static</body></html>";
        let result = substitute(template, &map(&[(PAGE_CONTENT, "ignored")]));
        assert_eq!(result, template);
    }

    #[test]
    fn test_substitute_script_token_inside_content() {
        // The home page's content carries the residual script token; the
        // registry orders PAGE_SCRIPTS after PAGE_CONTENT so it resolves.
        let template = "<body>{{PAGE_CONTENT}}</body>";
        let tokens = map(&[
            (PAGE_CONTENT, "<main/>{{PAGE_SCRIPTS}}"),
            (PAGE_SCRIPTS, "<script>go()</script>"),
        ]);
        assert_eq!(
            substitute(template, &tokens),
            "<body><main/><script>go()</script></body>"
        );
    }

    #[test]
    fn test_substitute_content_is_literal() {
        // Token content containing regex metacharacters must pass through
        // untouched; matching is plain text, not patterns.
        let tokens = map(&[(PAGE_CONTENT, r"$1 (.*) \d+")]);
        assert_eq!(
            substitute("{{PAGE_CONTENT}}", &tokens),
            r"$1 (.*) \d+"
        );
    }

    #[test]
    fn test_registry_orders_scripts_after_content() {
        let content_at = PLACEHOLDERS.iter().position(|t| *t == PAGE_CONTENT).unwrap();
        let scripts_at = PLACEHOLDERS.iter().position(|t| *t == PAGE_SCRIPTS).unwrap();
        assert!(content_at < scripts_at);
    }
}
