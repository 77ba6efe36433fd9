//! Content mining from the hand-written legacy documents.
//!
//! The home and stats pages predate the component system; their markup is
//! extracted from the original documents and spliced into the composed
//! output. Every expected construct that is absent logs a warning and
//! yields empty content; extraction never aborts a page build.

use crate::compiler::PAGE_SCRIPTS;
use crate::log;
use crate::utils::scan;

/// Interior of the first `<style>` element, for the `{{GLOBAL_STYLES}}`
/// token. First match wins; anything after the first closing tag is ignored.
pub fn global_styles(doc: &str, origin: &str) -> String {
    match scan::find_element(doc, "style") {
        Some(block) => block.inner(doc).to_string(),
        None => {
            log!("warn"; "{origin}: no <style> block found");
            String::new()
        }
    }
}

/// `<body>` interior of the legacy home document with the pre-component
/// chrome stripped: nav, decorative block, footer and legal-mentions modal
/// all come from fragments now. The first inline `<script>` element is
/// replaced by the residual `{{PAGE_SCRIPTS}}` token so the outer
/// substitution pass can put the extracted script back.
pub fn home_body(doc: &str, origin: &str) -> String {
    let Some(body) = scan::find_element(doc, "body") else {
        log!("warn"; "{origin}: no <body> region found");
        return String::new();
    };
    let mut content = body.inner(doc).to_string();

    strip_element(&mut content, "nav", origin);
    strip_decorations(&mut content, origin);
    strip_element(&mut content, "footer", origin);
    strip_modal(&mut content, origin);
    replace_inline_script(&mut content, origin);

    content
}

/// First inline `<script>` element of the legacy home document, re-wrapped,
/// for the `{{PAGE_SCRIPTS}}` token.
pub fn home_scripts(doc: &str, origin: &str) -> String {
    match find_plain_script(doc) {
        Some(block) => format!("<script>{}</script>", block.inner(doc)),
        None => {
            log!("warn"; "{origin}: no inline <script> found");
            String::new()
        }
    }
}

/// Markup between the `<div id="root"></div>` mount point and the end of
/// `<body>` in the legacy stats document.
pub fn stats_root_tail(doc: &str, origin: &str) -> String {
    let Some(body) = scan::find_element(doc, "body") else {
        log!("warn"; "{origin}: no <body> region found");
        return String::new();
    };
    let root = scan::find_element_with_attr(doc, "div", "id", "root")
        .filter(|block| block.start >= body.inner_start && block.end <= body.inner_end);
    match root {
        Some(block) => doc[block.end..body.inner_end].to_string(),
        None => {
            log!("warn"; "{origin}: no root mount point found");
            String::new()
        }
    }
}

/// The `<script type="text/babel">` element of the legacy stats document,
/// re-wrapped, for the `{{PAGE_SCRIPTS}}` token.
pub fn stats_scripts(doc: &str, origin: &str) -> String {
    let babel =
        scan::find_element_where(doc, 0, "script", |attrs| {
            scan::has_attr(attrs, "type", "text/babel")
        });
    match babel {
        Some(block) => format!(r#"<script type="text/babel">{}</script>"#, block.inner(doc)),
        None => {
            log!("warn"; "{origin}: no babel <script> found");
            String::new()
        }
    }
}

/// Remove the first element with the given tag name, warning when absent.
fn strip_element(content: &mut String, tag: &str, origin: &str) {
    match scan::find_element(content, tag) {
        Some(block) => {
            content.replace_range(block.range(), "");
        }
        None => log!("warn"; "{origin}: no <{tag}> to strip"),
    }
}

/// Remove the decorative block: from the `Decorative Elements` comment
/// through the closing `decoration-2` div.
fn strip_decorations(content: &mut String, origin: &str) {
    let Some(marker) = scan::find_comment(content, "Decorative Elements") else {
        log!("warn"; "{origin}: no decorative block to strip");
        return;
    };
    match scan::find_element_where(content, marker.end, "div", |attrs| {
        scan::has_attr(attrs, "class", "decoration-2")
    }) {
        Some(block) => {
            content.replace_range(marker.start..block.end, "");
        }
        None => log!("warn"; "{origin}: decorative block has no decoration-2 div"),
    }
}

/// Remove the legal-mentions modal: from its marker comment through the end
/// of the modal's own (nesting-matched) div.
fn strip_modal(content: &mut String, origin: &str) {
    let Some(marker) = scan::find_comment(content, "Modal Mentions Légales") else {
        log!("warn"; "{origin}: no modal block to strip");
        return;
    };
    match scan::find_balanced_element_from(content, marker.end, "div") {
        Some(block) => {
            content.replace_range(marker.start..block.end, "");
        }
        None => log!("warn"; "{origin}: modal block has no closing div"),
    }
}

/// Replace the first attribute-less `<script>` element with the residual
/// script placeholder token.
fn replace_inline_script(content: &mut String, origin: &str) {
    match find_plain_script(content) {
        Some(block) => content.replace_range(block.range(), PAGE_SCRIPTS),
        None => log!("warn"; "{origin}: no inline <script> to replace"),
    }
}

/// First `<script>` element with no attributes (external `<script src>` tags
/// are not inline scripts).
fn find_plain_script(doc: &str) -> Option<scan::Block> {
    scan::find_element_where(doc, 0, "script", str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME_DOC: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Mapikids</title>
<style>
body { margin: 0; }
.hero { color: teal; }
</style>
</head>
<body>
<nav><a href="/">Accueil</a></nav>
<!-- Decorative Elements -->
<div class="decoration-1"></div>
<div class="decoration-2"></div>
<main class="hero">
<h1>Bienvenue</h1>
</main>
<footer><p>© Mapikids</p></footer>
<!-- Modal Mentions Légales -->
<div class="modal" id="mentions">
  <div class="modal-body"><p>Mentions</p></div>
</div>
<script>
console.log("home");
</script>
</body>
</html>"#;

    const STATS_DOC: &str = r#"<!DOCTYPE html>
<html>
<head><title>Stats</title></head>
<body>
<div id="root"></div>
<script src="https://unpkg.com/react@18/umd/react.production.min.js"></script>
<script type="text/babel">
const App = () => <h1>Stats</h1>;
</script>
</body>
</html>"#;

    #[test]
    fn test_global_styles() {
        let styles = global_styles(HOME_DOC, "index.html");
        assert!(styles.contains("body { margin: 0; }"));
        assert!(styles.contains(".hero { color: teal; }"));
        assert!(!styles.contains("<style>"));
    }

    #[test]
    fn test_global_styles_missing() {
        assert_eq!(global_styles("<body></body>", "index.html"), "");
    }

    #[test]
    fn test_home_body_keeps_main_content() {
        let body = home_body(HOME_DOC, "index.html");
        assert!(body.contains("<h1>Bienvenue</h1>"));
    }

    #[test]
    fn test_home_body_strips_chrome() {
        let body = home_body(HOME_DOC, "index.html");
        assert!(!body.contains("<nav>"));
        assert!(!body.contains("decoration-1"));
        assert!(!body.contains("decoration-2"));
        assert!(!body.contains("<footer>"));
        assert!(!body.contains("Mentions"));
    }

    #[test]
    fn test_home_body_leaves_script_placeholder() {
        let body = home_body(HOME_DOC, "index.html");
        assert!(body.contains("{{PAGE_SCRIPTS}}"));
        assert!(!body.contains("console.log"));
    }

    #[test]
    fn test_home_body_missing_body_region() {
        assert_eq!(home_body("<html>no body</html>", "index.html"), "");
    }

    #[test]
    fn test_home_scripts_rewrapped() {
        let scripts = home_scripts(HOME_DOC, "index.html");
        assert!(scripts.starts_with("<script>"));
        assert!(scripts.ends_with("</script>"));
        assert!(scripts.contains(r#"console.log("home");"#));
    }

    #[test]
    fn test_stats_root_tail() {
        let tail = stats_root_tail(STATS_DOC, "stats.html");
        assert!(tail.contains("react.production.min.js"));
        assert!(tail.contains("text/babel"));
        assert!(!tail.contains(r#"<div id="root">"#));
        assert!(!tail.contains("</body>"));
    }

    #[test]
    fn test_stats_root_tail_missing_marker() {
        assert_eq!(stats_root_tail("<body>plain</body>", "stats.html"), "");
    }

    #[test]
    fn test_stats_scripts_only_babel() {
        let scripts = stats_scripts(STATS_DOC, "stats.html");
        assert!(scripts.starts_with(r#"<script type="text/babel">"#));
        assert!(scripts.contains("const App"));
        assert!(!scripts.contains("react.production.min.js"));
    }

    #[test]
    fn test_stats_scripts_missing() {
        assert_eq!(stats_scripts("<body></body>", "stats.html"), "");
    }
}
