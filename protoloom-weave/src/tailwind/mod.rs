//! Tailwind-compatible utility class engine.
//!
//! Scans rendered HTML for `class="..."` attributes, resolves each
//! recognised utility class to its CSS rule, and returns a CSS string
//! ready to inject into the preview document's `<style>` block.
//!
//! Covered: display, flexbox, alignment & gap, spacing, sizing,
//! typography, borders & radius, shadows/opacity/cursor, and
//! background/text/border colors (including `/NN` opacity modifiers and
//! arbitrary `[value]` forms). Unrecognised classes are skipped.

pub mod colors;
pub mod parser;
pub mod registry;
pub mod spacing;

pub use registry::CssRule;

/// Scan `html` for class attributes, resolve every recognised utility
/// class, and return the resulting CSS string.
pub fn generate_css(html: &str) -> String {
    let classes = parser::extract_classes(html);
    let refs: Vec<&str> = classes.iter().map(String::as_str).collect();
    generate_css_for_classes(&refs)
}

/// Resolve an explicit slice of class names to CSS.
///
/// Deduplicates classes and skips any that are not recognised.
pub fn generate_css_for_classes(classes: &[&str]) -> String {
    let mut seen = std::collections::HashSet::new();
    let mut rules: Vec<CssRule> = Vec::new();

    for &class in classes {
        if seen.insert(class) {
            if let Some(rule) = registry::resolve_class(class) {
                rules.push(rule);
            }
        }
    }

    render_css(&rules)
}

fn render_css(rules: &[CssRule]) -> String {
    if rules.is_empty() {
        return String::new();
    }

    let mut css = String::from("*, *::before, *::after { box-sizing: border-box; }\n");

    for rule in rules {
        css.push_str(&rule.selector);
        css.push_str(" {");
        for (prop, val) in &rule.declarations {
            css.push(' ');
            css.push_str(prop);
            css.push_str(": ");
            css.push_str(val);
            css.push(';');
        }
        css.push_str(" }\n");
    }

    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pipeline() {
        let html = r#"<div class="flex flex-col p-4 bg-blue-500 text-white w-full"></div>"#;
        let css = generate_css(html);

        assert!(css.contains(".flex { display: flex; }"));
        assert!(css.contains(".flex-col { flex-direction: column; }"));
        assert!(css.contains(".p-4 { padding: 1rem; }"));
        assert!(css.contains(".bg-blue-500 { background-color: #3b82f6; }"));
        assert!(css.contains(".text-white { color: #ffffff; }"));
        assert!(css.contains(".w-full { width: 100%; }"));
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(generate_css("<div></div>"), "");
    }

    #[test]
    fn deduplication() {
        let html = r#"<div class="flex p-4"><span class="flex p-8"></span></div>"#;
        let css = generate_css(html);
        assert_eq!(css.matches(".flex {").count(), 1);
    }

    #[test]
    fn unknown_classes_are_skipped() {
        let html = r#"<div class="totally-made-up"></div>"#;
        assert_eq!(generate_css(html), "");
    }
}
