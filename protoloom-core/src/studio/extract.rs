//! Extracts a renderable unit from a free-form chat response.
//! Responses mix prose, fenced code blocks, and partial code; this module
//! finds the one component worth rendering, or reports that there is none.

use regex::Regex;
use std::sync::OnceLock;

/// Name the generation prompt asks the model to use; also the fallback
/// when no declaration name can be derived.
pub const DEFAULT_UNIT_NAME: &str = "GeneratedComponent";

/// A unit parsed out of one chat response. `source_text` is never empty;
/// an extraction that would produce empty source returns `None` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedUnit {
    pub name: String,
    pub source_text: String,
    pub style_text: String,
}

fn luau_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```luau[ \t]*\n(.*?)\n?```").unwrap())
}

fn lua_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```lua[ \t]*\n(.*?)\n?```").unwrap())
}

fn plain_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```[ \t]*\n(.*?)\n?```").unwrap())
}

fn css_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```css[ \t]*\n(.*?)\n?```").unwrap())
}

fn function_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(function\s+GeneratedComponent\b[\s\S]*?^end\b)").unwrap()
    })
}

fn local_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(local\s+GeneratedComponent\s*=[\s\S]*?^end\b)").unwrap()
    })
}

fn declared_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"function\s+([A-Za-z_]\w*)|local\s+([A-Za-z_]\w*)\s*=").unwrap()
    })
}

/// Parse a chat response into a unit, or `None` when no plausible unit is
/// present.
///
/// Fence priority: ```` ```luau ````, then ```` ```lua ````, then an
/// untagged fence — first match wins, the first closing fence terminates
/// the block. When the candidate contains a `GeneratedComponent`
/// declaration, the candidate is trimmed to that declaration's span. A
/// ```` ```css ```` fence anywhere in the response supplies `style_text`.
pub fn extract_unit(response_text: &str) -> Option<ExtractedUnit> {
    let style_text = css_fence()
        .captures(response_text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let mut source = first_fence(response_text).unwrap_or_default();

    if !source.is_empty() {
        if let Some(span) = component_span(&source) {
            source = span;
        }
        if is_plausible(&source) {
            return Some(ExtractedUnit {
                name: derive_name(&source),
                source_text: source,
                style_text,
            });
        }
        return None;
    }

    // Raw fallback: no code fence, but the response itself may be code
    let raw = response_text.trim();
    if (raw.contains("function") || raw.contains("local")) && is_plausible(raw) {
        return Some(ExtractedUnit {
            name: derive_name(raw),
            source_text: raw.to_string(),
            style_text,
        });
    }

    None
}

fn first_fence(text: &str) -> Option<String> {
    for re in [luau_fence(), lua_fence(), plain_fence()] {
        if let Some(captures) = re.captures(text) {
            let inner = captures[1].trim();
            if !inner.is_empty() {
                return Some(inner.to_string());
            }
        }
    }
    None
}

fn component_span(candidate: &str) -> Option<String> {
    function_span()
        .captures(candidate)
        .or_else(|| local_span().captures(candidate))
        .map(|c| c[1].to_string())
}

/// Minimal syntactic plausibility: a declaration keyword or a return.
fn is_plausible(candidate: &str) -> bool {
    candidate.contains("function") || candidate.contains("local") || candidate.contains("return")
}

fn derive_name(source: &str) -> String {
    declared_name()
        .captures(source)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_UNIT_NAME.to_string())
}
