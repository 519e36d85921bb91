//! Renders a weave tree to safe HTML for the preview surface.
//! No script tags, no inline event handlers; interactive elements carry a
//! `data-handler` attribute that the execution layer replays against the
//! sandbox. Only the unit's own stylesheet text is injected unescaped, and
//! only inside the `<style>` block (isolation is the safety boundary, not
//! selector rewriting).

use crate::node::*;
use crate::tailwind;
use std::fmt::Write;

/// Base document styles (body, preview card, diagnostic views). The
/// utility engine generates only utility classes; everything baseline
/// lives here so unit CSS can override it by source order.
const BASE_STYLES: &str = "html,body{margin:0;min-height:100vh;background:#f9fafb;color:#111827;\
font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;}\
.preview-container{background:#ffffff;border-radius:12px;padding:24px;margin:20px auto;\
box-shadow:0 4px 6px -1px rgba(0,0,0,0.1),0 2px 4px -1px rgba(0,0,0,0.06);\
border:1px solid rgba(0,0,0,0.05);overflow:auto;}\
.weave-button{font:inherit;cursor:pointer;border:1px solid #d1d5db;border-radius:6px;\
padding:0.5rem 1rem;background:#ffffff;}\
.weave-button:disabled{cursor:not-allowed;opacity:0.5;}\
.weave-input{font:inherit;border:1px solid #d1d5db;border-radius:6px;padding:0.5rem 0.75rem;}\
.weave-badge{display:inline-block;border-radius:9999px;padding:0.125rem 0.625rem;\
font-size:0.75rem;background:#f3f4f6;color:#374151;}\
.weave-divider{border:none;border-top:1px solid #e5e7eb;margin:0.75rem 0;}\
.weave-icon{display:inline-block;line-height:1;vertical-align:middle;}\
.weave-error{max-width:28rem;margin:3rem auto;padding:1.5rem;border:1px solid #fca5a5;\
border-radius:8px;background:#fef2f2;color:#7f1d1d;}\
.weave-error h1{font-size:1rem;margin:0 0 0.5rem;}\
.weave-error pre{white-space:pre-wrap;word-break:break-word;background:#ffffff;\
border:1px solid #fecaca;border-radius:6px;padding:0.75rem;font-size:0.8rem;color:#991b1b;}\
.weave-error ul{margin:0.5rem 0 0;padding-left:1.25rem;font-size:0.85rem;}\
.weave-empty{text-align:center;color:#6b7280;margin:4rem auto;}";

/// Escapes text content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Glyph stand-in for an icon name. Icons render as text glyphs; the
/// sandbox never loads remote assets.
fn icon_glyph(name: &str) -> &'static str {
    match name {
        "Heart" => "\u{2665}",
        "Star" => "\u{2605}",
        "Check" => "\u{2713}",
        "X" => "\u{2715}",
        "Plus" => "\u{FF0B}",
        "Minus" => "\u{2212}",
        "ChevronDown" => "\u{2304}",
        "ChevronUp" => "\u{2303}",
        "ChevronLeft" => "\u{2039}",
        "ChevronRight" => "\u{203A}",
        "ArrowRight" => "\u{2192}",
        "ArrowLeft" => "\u{2190}",
        "Sun" => "\u{2600}",
        "Moon" => "\u{263E}",
        "Search" => "\u{2315}",
        "Mail" => "\u{2709}",
        "Phone" => "\u{260E}",
        "Calendar" => "\u{1F4C5}",
        "Bell" => "\u{1F514}",
        "Eye" => "\u{1F441}",
        "Lock" => "\u{1F512}",
        "User" => "\u{1F464}",
        "Home" => "\u{2302}",
        "Settings" => "\u{2699}",
        "Menu" => "\u{2630}",
        "Play" => "\u{25B6}",
        "Pause" => "\u{23F8}",
        "Download" => "\u{2913}",
        "Upload" => "\u{2912}",
        "Trash" => "\u{1F5D1}",
        "Edit" => "\u{270E}",
        "Copy" => "\u{29C9}",
        "Link" => "\u{1F517}",
        "Share" => "\u{2934}",
        "Save" => "\u{1F4BE}",
        "File" => "\u{1F4C4}",
        "Camera" => "\u{1F4F7}",
        "AlertCircle" => "\u{26A0}",
        "Info" => "\u{2139}",
        "ShoppingCart" => "\u{1F6D2}",
        "Coffee" => "\u{2615}",
        "Book" => "\u{1F4D6}",
        "Award" => "\u{1F3C6}",
        "Globe" => "\u{1F310}",
        "Code" => "\u{2328}",
        "Database" => "\u{26C3}",
        "Smartphone" => "\u{1F4F1}",
        "Filter" => "\u{2A93}",
        _ => "\u{25C6}",
    }
}

fn open_tag(out: &mut String, tag: &str, id: &Option<String>, class: &Option<String>, extra: &str) {
    out.push('<');
    out.push_str(tag);
    if let Some(id) = id {
        let _ = write!(out, " id=\"{}\"", escape_html(id));
    }
    if let Some(class) = class {
        let _ = write!(out, " class=\"{}\"", escape_html(class));
    }
    out.push_str(extra);
    out.push('>');
}

/// Renders one node (and its subtree) into `out`.
pub fn node_to_html(node: &Node, out: &mut String) {
    match node {
        Node::Container(c) => {
            open_tag(out, "div", &c.id, &c.class, "");
            for child in &c.children {
                node_to_html(child, out);
            }
            out.push_str("</div>");
        }
        Node::Text(t) => {
            open_tag(out, "span", &t.id, &t.class, "");
            out.push_str(&escape_html(&t.text));
            out.push_str("</span>");
        }
        Node::Button(b) => {
            let class = merge_class("weave-button", &b.class);
            let mut extra = String::new();
            if let Some(handler) = b.handler {
                let _ = write!(extra, " data-handler=\"{}\"", handler);
            }
            if b.disabled {
                extra.push_str(" disabled");
            }
            open_tag(out, "button", &b.id, &Some(class), &extra);
            out.push_str(&escape_html(&b.label));
            out.push_str("</button>");
        }
        Node::Input(i) => {
            let class = merge_class("weave-input", &i.class);
            let mut extra = String::new();
            if let Some(name) = &i.name {
                let _ = write!(extra, " name=\"{}\"", escape_html(name));
            }
            if let Some(placeholder) = &i.placeholder {
                let _ = write!(extra, " placeholder=\"{}\"", escape_html(placeholder));
            }
            if let Some(value) = &i.value {
                let _ = write!(extra, " value=\"{}\"", escape_html(value));
            }
            out.push('<');
            out.push_str("input");
            if let Some(id) = &i.id {
                let _ = write!(out, " id=\"{}\"", escape_html(id));
            }
            let _ = write!(out, " class=\"{}\"{}/>", escape_html(&class), extra);
        }
        Node::Image(img) => {
            let mut extra = format!(" src=\"{}\"", escape_html(&img.src));
            if let Some(alt) = &img.alt {
                let _ = write!(extra, " alt=\"{}\"", escape_html(alt));
            }
            out.push_str("<img");
            if let Some(id) = &img.id {
                let _ = write!(out, " id=\"{}\"", escape_html(id));
            }
            if let Some(class) = &img.class {
                let _ = write!(out, " class=\"{}\"", escape_html(class));
            }
            out.push_str(&extra);
            out.push_str("/>");
        }
        Node::Icon(icon) => {
            let class = merge_class("weave-icon", &icon.class);
            let size = icon.size.unwrap_or(16.0);
            let extra = format!(
                " data-icon=\"{}\" style=\"font-size:{}px\"",
                escape_html(&icon.name),
                size
            );
            open_tag(out, "span", &icon.id, &Some(class), &extra);
            out.push_str(icon_glyph(&icon.name));
            out.push_str("</span>");
        }
        Node::Badge(b) => {
            let class = merge_class("weave-badge", &b.class);
            open_tag(out, "span", &b.id, &Some(class), "");
            out.push_str(&escape_html(&b.text));
            out.push_str("</span>");
        }
        Node::Divider(d) => {
            let class = merge_class("weave-divider", &d.class);
            out.push_str("<hr");
            if let Some(id) = &d.id {
                let _ = write!(out, " id=\"{}\"", escape_html(id));
            }
            let _ = write!(out, " class=\"{}\"/>", escape_html(&class));
        }
        Node::Spacer(s) => {
            let size = s.size.unwrap_or(16.0);
            let extra = format!(" style=\"height:{}px\" aria-hidden=\"true\"", size);
            open_tag(out, "div", &s.id, &s.class, &extra);
            out.push_str("</div>");
        }
    }
}

fn merge_class(base: &str, class: &Option<String>) -> String {
    match class {
        Some(c) if !c.is_empty() => format!("{} {}", base, c),
        _ => base.to_string(),
    }
}

/// Assembles the full preview document for a rendered tree.
///
/// Style order inside the single `<style>` block is load-bearing:
/// baseline, then generated utility CSS, then the unit's stylesheet text
/// verbatim, so unit styles win by source order.
pub fn render_preview_document(
    root: &Node,
    dimensions: Option<(u32, u32)>,
    style_text: &str,
) -> String {
    let mut body = String::new();
    node_to_html(root, &mut body);

    let utility_css = tailwind::generate_css(&body);

    let container_style = match dimensions {
        Some((w, h)) => format!(" style=\"width:{}px;min-height:{}px\"", w, h),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>Component Preview</title>\n<style>\n{}\n{}\n{}\n</style>\n</head>\n<body>\n\
<div class=\"preview-container\"{}>{}</div>\n</body>\n</html>\n",
        BASE_STYLES, utility_css, style_text, container_style, body
    )
}

/// Diagnostic fallback document: failure header, the raw error message
/// verbatim (escaped), and a static checklist of likely causes.
pub fn diagnostic_document(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<title>Component Preview</title>\n<style>\n{}\n</style>\n</head>\n<body>\n\
<div class=\"weave-error\">\n<h1>Component failed to render</h1>\n<pre>{}</pre>\n\
<ul>\n<li>Syntax error in the generated code</li>\n\
<li>Missing <code>GeneratedComponent</code> declaration</li>\n\
<li>Reference to a symbol the runtime does not provide</li>\n\
<li>Malformed markup returned by the component</li>\n</ul>\n</div>\n</body>\n</html>\n",
        BASE_STYLES,
        escape_html(message)
    )
}

/// Pane-level error document: the sandbox itself could not be created.
/// Distinct from the code diagnostic; this indicates a host problem.
pub fn unavailable_document(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<title>Component Preview</title>\n<style>\n{}\n</style>\n</head>\n<body>\n\
<div class=\"weave-error\">\n<h1>Preview sandbox unavailable</h1>\n<pre>{}</pre>\n\
<p>This is a host environment problem, not an error in the generated code.</p>\n\
</div>\n</body>\n</html>\n",
        BASE_STYLES,
        escape_html(message)
    )
}

/// Placeholder shown before any unit has been generated.
pub fn empty_document() -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<title>Component Preview</title>\n<style>\n{}\n</style>\n</head>\n<body>\n\
<div class=\"weave-empty\">\n<h3>No preview available</h3>\n\
<p>Generate a component to see the live preview</p>\n</div>\n</body>\n</html>\n",
        BASE_STYLES
    )
}
