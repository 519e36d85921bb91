use super::colors;
use super::spacing;

/// A single resolved CSS rule.
#[derive(Debug, Clone)]
pub struct CssRule {
    /// Full CSS selector, e.g. `.flex`, `.w-1\/2`
    pub selector: String,
    /// CSS declarations, e.g. `[("display", "flex")]`
    pub declarations: Vec<(String, String)>,
}

impl CssRule {
    fn new(class: &str, props: &[(&str, &str)]) -> Self {
        Self {
            selector: format!(".{}", escape_selector(class)),
            declarations: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn dynamic(class: &str, props: Vec<(String, String)>) -> Self {
        Self {
            selector: format!(".{}", escape_selector(class)),
            declarations: props,
        }
    }
}

/// Escapes CSS special characters in a class name so it can be used in a selector.
fn escape_selector(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 4);
    for ch in class.chars() {
        match ch {
            '.' | '/' | '[' | ']' | '(' | ')' | '%' | '#' | ':' | '@' | '!' | ',' | '~' | '^'
            | '$' | '&' | '+' | '=' | '<' | '>' | '|' | '\'' | '"' | ';' | '{' | '}' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

// ─── Public resolver ────────────────────────────────────────────────────────

/// Resolves a single utility class string to a CSS rule.
///
/// Returns `None` if the class is not recognised (no rule emitted).
pub fn resolve_class(class: &str) -> Option<CssRule> {
    resolve_display(class)
        .or_else(|| resolve_flex(class))
        .or_else(|| resolve_alignment(class))
        .or_else(|| resolve_spacing(class))
        .or_else(|| resolve_sizing(class))
        .or_else(|| resolve_typography(class))
        .or_else(|| resolve_border(class))
        .or_else(|| resolve_radius(class))
        .or_else(|| resolve_effects(class))
        .or_else(|| resolve_bg_color(class))
        .or_else(|| resolve_text_color(class))
        .or_else(|| resolve_border_color(class))
}

// ─── Display ────────────────────────────────────────────────────────────────

fn resolve_display(class: &str) -> Option<CssRule> {
    let display = match class {
        "block" => "block",
        "inline-block" => "inline-block",
        "inline" => "inline",
        "flex" => "flex",
        "inline-flex" => "inline-flex",
        "grid" => "grid",
        "inline-grid" => "inline-grid",
        "hidden" => "none",
        _ => return None,
    };
    Some(CssRule::new(class, &[("display", display)]))
}

// ─── Flexbox ────────────────────────────────────────────────────────────────

fn resolve_flex(class: &str) -> Option<CssRule> {
    let props: &[(&str, &str)] = match class {
        "flex-row" => &[("flex-direction", "row")],
        "flex-row-reverse" => &[("flex-direction", "row-reverse")],
        "flex-col" => &[("flex-direction", "column")],
        "flex-col-reverse" => &[("flex-direction", "column-reverse")],
        "flex-wrap" => &[("flex-wrap", "wrap")],
        "flex-nowrap" => &[("flex-wrap", "nowrap")],
        "flex-1" => &[("flex", "1 1 0%")],
        "flex-auto" => &[("flex", "1 1 auto")],
        "flex-none" => &[("flex", "none")],
        "grow" => &[("flex-grow", "1")],
        "grow-0" => &[("flex-grow", "0")],
        "shrink" => &[("flex-shrink", "1")],
        "shrink-0" => &[("flex-shrink", "0")],
        _ => {
            // grid-cols-N
            if let Some(n) = class.strip_prefix("grid-cols-") {
                let count: u32 = n.parse().ok()?;
                if count == 0 || count > 12 {
                    return None;
                }
                return Some(CssRule::dynamic(
                    class,
                    vec![(
                        "grid-template-columns".to_string(),
                        format!("repeat({}, minmax(0, 1fr))", count),
                    )],
                ));
            }
            return None;
        }
    };
    Some(CssRule::new(class, props))
}

// ─── Alignment & gap ────────────────────────────────────────────────────────

fn resolve_alignment(class: &str) -> Option<CssRule> {
    let props: &[(&str, &str)] = match class {
        "justify-start" => &[("justify-content", "flex-start")],
        "justify-center" => &[("justify-content", "center")],
        "justify-end" => &[("justify-content", "flex-end")],
        "justify-between" => &[("justify-content", "space-between")],
        "justify-around" => &[("justify-content", "space-around")],
        "justify-evenly" => &[("justify-content", "space-evenly")],
        "items-start" => &[("align-items", "flex-start")],
        "items-center" => &[("align-items", "center")],
        "items-end" => &[("align-items", "flex-end")],
        "items-stretch" => &[("align-items", "stretch")],
        "items-baseline" => &[("align-items", "baseline")],
        "self-start" => &[("align-self", "flex-start")],
        "self-center" => &[("align-self", "center")],
        "self-end" => &[("align-self", "flex-end")],
        "self-stretch" => &[("align-self", "stretch")],
        "text-left" => &[("text-align", "left")],
        "text-center" => &[("text-align", "center")],
        "text-right" => &[("text-align", "right")],
        _ => {
            for (prefix, prop) in [
                ("gap-", &["gap"][..]),
                ("gap-x-", &["column-gap"][..]),
                ("gap-y-", &["row-gap"][..]),
            ] {
                // gap-x-/gap-y- must be tried before the bare gap- prefix
                if prefix == "gap-"
                    && (class.starts_with("gap-x-") || class.starts_with("gap-y-"))
                {
                    continue;
                }
                if let Some(val) = class.strip_prefix(prefix) {
                    let css_val = resolve_spacing_or_arbitrary(val)?;
                    return Some(CssRule::dynamic(
                        class,
                        prop.iter().map(|p| (p.to_string(), css_val.clone())).collect(),
                    ));
                }
            }
            return None;
        }
    };
    Some(CssRule::new(class, props))
}

// ─── Spacing (padding / margin) ─────────────────────────────────────────────

fn resolve_spacing(class: &str) -> Option<CssRule> {
    let (neg, rest) = match class.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, class),
    };

    let (props, val_str): (&[&str], &str) = if let Some(v) = rest.strip_prefix("px-") {
        (&["padding-left", "padding-right"], v)
    } else if let Some(v) = rest.strip_prefix("py-") {
        (&["padding-top", "padding-bottom"], v)
    } else if let Some(v) = rest.strip_prefix("pt-") {
        (&["padding-top"], v)
    } else if let Some(v) = rest.strip_prefix("pr-") {
        (&["padding-right"], v)
    } else if let Some(v) = rest.strip_prefix("pb-") {
        (&["padding-bottom"], v)
    } else if let Some(v) = rest.strip_prefix("pl-") {
        (&["padding-left"], v)
    } else if let Some(v) = rest.strip_prefix("p-") {
        (&["padding"], v)
    } else if let Some(v) = rest.strip_prefix("mx-") {
        (&["margin-left", "margin-right"], v)
    } else if let Some(v) = rest.strip_prefix("my-") {
        (&["margin-top", "margin-bottom"], v)
    } else if let Some(v) = rest.strip_prefix("mt-") {
        (&["margin-top"], v)
    } else if let Some(v) = rest.strip_prefix("mr-") {
        (&["margin-right"], v)
    } else if let Some(v) = rest.strip_prefix("mb-") {
        (&["margin-bottom"], v)
    } else if let Some(v) = rest.strip_prefix("ml-") {
        (&["margin-left"], v)
    } else if let Some(v) = rest.strip_prefix("m-") {
        (&["margin"], v)
    } else {
        return None;
    };

    // Padding cannot be negative; margin-auto only in positive form
    let css_val = if val_str == "auto" {
        if neg || props[0].starts_with("padding") {
            return None;
        }
        "auto".to_string()
    } else {
        let base = resolve_spacing_or_arbitrary(val_str)?;
        if neg {
            if props[0].starts_with("padding") || base == "0px" {
                return None;
            }
            format!("-{}", base)
        } else {
            base
        }
    };

    Some(CssRule::dynamic(
        class,
        props
            .iter()
            .map(|p| (p.to_string(), css_val.clone()))
            .collect(),
    ))
}

// ─── Sizing ─────────────────────────────────────────────────────────────────

fn resolve_sizing(class: &str) -> Option<CssRule> {
    if let Some(val) = class.strip_prefix("min-w-") {
        let css_val = resolve_size_value(val, SizeContext::Width)?;
        return Some(CssRule::dynamic(class, vec![("min-width".into(), css_val)]));
    }
    if let Some(val) = class.strip_prefix("max-w-") {
        let css_val = match val {
            "none" => "none".to_string(),
            _ => resolve_size_value(val, SizeContext::Width)?,
        };
        return Some(CssRule::dynamic(class, vec![("max-width".into(), css_val)]));
    }
    if let Some(val) = class.strip_prefix("min-h-") {
        let css_val = resolve_size_value(val, SizeContext::Height)?;
        return Some(CssRule::dynamic(class, vec![("min-height".into(), css_val)]));
    }
    if let Some(val) = class.strip_prefix("max-h-") {
        let css_val = match val {
            "none" => "none".to_string(),
            _ => resolve_size_value(val, SizeContext::Height)?,
        };
        return Some(CssRule::dynamic(class, vec![("max-height".into(), css_val)]));
    }
    if let Some(val) = class.strip_prefix("w-") {
        let css_val = resolve_size_value(val, SizeContext::Width)?;
        return Some(CssRule::dynamic(class, vec![("width".into(), css_val)]));
    }
    if let Some(val) = class.strip_prefix("h-") {
        let css_val = resolve_size_value(val, SizeContext::Height)?;
        return Some(CssRule::dynamic(class, vec![("height".into(), css_val)]));
    }
    if let Some(val) = class.strip_prefix("size-") {
        let css_val = resolve_size_value(val, SizeContext::Width)?;
        return Some(CssRule::dynamic(
            class,
            vec![("width".into(), css_val.clone()), ("height".into(), css_val)],
        ));
    }
    None
}

#[derive(Clone, Copy)]
enum SizeContext {
    Width,
    Height,
}

/// Resolves a size/dimension token to a CSS value.
///
/// Handles: spacing scale, keywords (auto, full, min, max, fit, screen),
/// container sizes (xs … 7xl), fractions (1/2, 2/3 …), and arbitrary `[value]`.
fn resolve_size_value(val: &str, ctx: SizeContext) -> Option<String> {
    match val {
        "auto" => return Some("auto".into()),
        "full" => return Some("100%".into()),
        "min" => return Some("min-content".into()),
        "max" => return Some("max-content".into()),
        "fit" => return Some("fit-content".into()),
        "screen" => {
            return Some(
                match ctx {
                    SizeContext::Width => "100vw",
                    SizeContext::Height => "100vh",
                }
                .into(),
            )
        }
        "xs" => return Some("20rem".into()),
        "sm" => return Some("24rem".into()),
        "md" => return Some("28rem".into()),
        "lg" => return Some("32rem".into()),
        "xl" => return Some("36rem".into()),
        "2xl" => return Some("42rem".into()),
        "3xl" => return Some("48rem".into()),
        "4xl" => return Some("56rem".into()),
        "5xl" => return Some("64rem".into()),
        "6xl" => return Some("72rem".into()),
        "7xl" => return Some("80rem".into()),
        _ => {}
    }

    // Fraction: "1/2", "2/3", etc.
    if let Some(slash) = val.find('/') {
        let num: f64 = val[..slash].parse().ok()?;
        let den: f64 = val[slash + 1..].parse().ok()?;
        if den == 0.0 {
            return None;
        }
        let pct = num / den * 100.0;
        let s = format!("{:.6}", pct);
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        return Some(format!("{}%", trimmed));
    }

    if let Some(inner) = arbitrary_value(val) {
        return Some(inner);
    }

    spacing::spacing_value(val)
}

// ─── Typography ─────────────────────────────────────────────────────────────

fn resolve_typography(class: &str) -> Option<CssRule> {
    let props: &[(&str, &str)] = match class {
        "text-xs" => &[("font-size", "0.75rem"), ("line-height", "1rem")],
        "text-sm" => &[("font-size", "0.875rem"), ("line-height", "1.25rem")],
        "text-base" => &[("font-size", "1rem"), ("line-height", "1.5rem")],
        "text-lg" => &[("font-size", "1.125rem"), ("line-height", "1.75rem")],
        "text-xl" => &[("font-size", "1.25rem"), ("line-height", "1.75rem")],
        "text-2xl" => &[("font-size", "1.5rem"), ("line-height", "2rem")],
        "text-3xl" => &[("font-size", "1.875rem"), ("line-height", "2.25rem")],
        "text-4xl" => &[("font-size", "2.25rem"), ("line-height", "2.5rem")],
        "text-5xl" => &[("font-size", "3rem"), ("line-height", "1")],
        "font-thin" => &[("font-weight", "100")],
        "font-light" => &[("font-weight", "300")],
        "font-normal" => &[("font-weight", "400")],
        "font-medium" => &[("font-weight", "500")],
        "font-semibold" => &[("font-weight", "600")],
        "font-bold" => &[("font-weight", "700")],
        "font-extrabold" => &[("font-weight", "800")],
        "font-mono" => &[("font-family", "ui-monospace, monospace")],
        "italic" => &[("font-style", "italic")],
        "not-italic" => &[("font-style", "normal")],
        "underline" => &[("text-decoration", "underline")],
        "line-through" => &[("text-decoration", "line-through")],
        "no-underline" => &[("text-decoration", "none")],
        "uppercase" => &[("text-transform", "uppercase")],
        "lowercase" => &[("text-transform", "lowercase")],
        "capitalize" => &[("text-transform", "capitalize")],
        "truncate" => &[
            ("overflow", "hidden"),
            ("text-overflow", "ellipsis"),
            ("white-space", "nowrap"),
        ],
        "tracking-tight" => &[("letter-spacing", "-0.025em")],
        "tracking-wide" => &[("letter-spacing", "0.025em")],
        "leading-none" => &[("line-height", "1")],
        "leading-tight" => &[("line-height", "1.25")],
        "leading-normal" => &[("line-height", "1.5")],
        "leading-relaxed" => &[("line-height", "1.625")],
        _ => return None,
    };
    Some(CssRule::new(class, props))
}

// ─── Borders ────────────────────────────────────────────────────────────────

fn resolve_border(class: &str) -> Option<CssRule> {
    let props: &[(&str, &str)] = match class {
        "border" => &[("border-width", "1px"), ("border-style", "solid")],
        "border-0" => &[("border-width", "0px")],
        "border-2" => &[("border-width", "2px"), ("border-style", "solid")],
        "border-4" => &[("border-width", "4px"), ("border-style", "solid")],
        "border-t" => &[("border-top-width", "1px"), ("border-top-style", "solid")],
        "border-b" => &[
            ("border-bottom-width", "1px"),
            ("border-bottom-style", "solid"),
        ],
        "border-l" => &[("border-left-width", "1px"), ("border-left-style", "solid")],
        "border-r" => &[
            ("border-right-width", "1px"),
            ("border-right-style", "solid"),
        ],
        "border-dashed" => &[("border-style", "dashed")],
        "border-dotted" => &[("border-style", "dotted")],
        "border-none" => &[("border-style", "none")],
        _ => return None,
    };
    Some(CssRule::new(class, props))
}

fn resolve_radius(class: &str) -> Option<CssRule> {
    let radius = match class {
        "rounded-none" => "0px",
        "rounded-sm" => "0.125rem",
        "rounded" => "0.25rem",
        "rounded-md" => "0.375rem",
        "rounded-lg" => "0.5rem",
        "rounded-xl" => "0.75rem",
        "rounded-2xl" => "1rem",
        "rounded-3xl" => "1.5rem",
        "rounded-full" => "9999px",
        _ => return None,
    };
    Some(CssRule::new(class, &[("border-radius", radius)]))
}

// ─── Effects & interaction ──────────────────────────────────────────────────

fn resolve_effects(class: &str) -> Option<CssRule> {
    let props: &[(&str, &str)] = match class {
        "shadow-sm" => &[("box-shadow", "0 1px 2px 0 rgba(0, 0, 0, 0.05)")],
        "shadow" => &[(
            "box-shadow",
            "0 1px 3px 0 rgba(0, 0, 0, 0.1), 0 1px 2px -1px rgba(0, 0, 0, 0.1)",
        )],
        "shadow-md" => &[(
            "box-shadow",
            "0 4px 6px -1px rgba(0, 0, 0, 0.1), 0 2px 4px -2px rgba(0, 0, 0, 0.1)",
        )],
        "shadow-lg" => &[(
            "box-shadow",
            "0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -4px rgba(0, 0, 0, 0.1)",
        )],
        "shadow-xl" => &[(
            "box-shadow",
            "0 20px 25px -5px rgba(0, 0, 0, 0.1), 0 8px 10px -6px rgba(0, 0, 0, 0.1)",
        )],
        "shadow-none" => &[("box-shadow", "none")],
        "cursor-pointer" => &[("cursor", "pointer")],
        "cursor-default" => &[("cursor", "default")],
        "cursor-not-allowed" => &[("cursor", "not-allowed")],
        "transition" => &[
            ("transition-property", "all"),
            ("transition-duration", "150ms"),
            (
                "transition-timing-function",
                "cubic-bezier(0.4, 0, 0.2, 1)",
            ),
        ],
        "overflow-hidden" => &[("overflow", "hidden")],
        "overflow-auto" => &[("overflow", "auto")],
        "overflow-x-auto" => &[("overflow-x", "auto")],
        "overflow-y-auto" => &[("overflow-y", "auto")],
        _ => {
            if let Some(val) = class.strip_prefix("opacity-") {
                let pct: f64 = val.parse().ok()?;
                if !(0.0..=100.0).contains(&pct) {
                    return None;
                }
                let s = format!("{:.2}", pct / 100.0);
                let trimmed = s.trim_end_matches('0').trim_end_matches('.');
                return Some(CssRule::dynamic(
                    class,
                    vec![(
                        "opacity".to_string(),
                        if trimmed.is_empty() { "0" } else { trimmed }.to_string(),
                    )],
                ));
            }
            return None;
        }
    };
    Some(CssRule::new(class, props))
}

// ─── Colors ─────────────────────────────────────────────────────────────────

fn resolve_bg_color(class: &str) -> Option<CssRule> {
    let val = class.strip_prefix("bg-")?;
    resolve_color_value(val, class, "background-color")
}

fn resolve_text_color(class: &str) -> Option<CssRule> {
    let val = class.strip_prefix("text-")?;
    // text-{size}/{align} already matched earlier in the chain; skip the
    // remaining non-color keywords so they don't parse as colors
    match val {
        "wrap" | "nowrap" | "balance" | "pretty" | "ellipsis" | "clip" => return None,
        _ => {}
    }
    resolve_color_value(val, class, "color")
}

fn resolve_border_color(class: &str) -> Option<CssRule> {
    let val = class.strip_prefix("border-")?;
    resolve_color_value(val, class, "border-color")
}

/// Shared color resolution for `bg-`, `text-`, and `border-` prefixes.
fn resolve_color_value(val: &str, class: &str, property: &str) -> Option<CssRule> {
    match val {
        "transparent" => return Some(CssRule::new(class, &[(property, "transparent")])),
        "current" => return Some(CssRule::new(class, &[(property, "currentColor")])),
        "inherit" => return Some(CssRule::new(class, &[(property, "inherit")])),
        "black" => return Some(CssRule::new(class, &[(property, "#000000")])),
        "white" => return Some(CssRule::new(class, &[(property, "#ffffff")])),
        _ => {}
    }

    // Arbitrary: bg-[#ff0000] or bg-[rgb(255,0,0)]
    if let Some(inner) = arbitrary_value(val) {
        return Some(CssRule::dynamic(class, vec![(property.to_string(), inner)]));
    }

    // Opacity modifier: "blue-500/50"
    let (color_part, opacity) = match val.rfind('/') {
        Some(slash) => (&val[..slash], Some(&val[slash + 1..])),
        None => (val, None),
    };

    // Parse "family-shade", e.g. "blue-500"
    let last_dash = color_part.rfind('-')?;
    let family = &color_part[..last_dash];
    let shade: u16 = color_part[last_dash + 1..].parse().ok()?;

    let hex = colors::lookup(family, shade)?;

    let css_val = match opacity {
        Some(op_str) => {
            let op_pct: f64 = op_str.parse().ok()?;
            match colors::hex_to_rgb(hex) {
                Some((r, g, b)) => format!("rgba({}, {}, {}, {})", r, g, b, op_pct / 100.0),
                None => hex.to_string(),
            }
        }
        None => hex.to_string(),
    };

    Some(CssRule::dynamic(class, vec![(property.to_string(), css_val)]))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// `[value]` arbitrary form; underscores stand in for spaces.
fn arbitrary_value(val: &str) -> Option<String> {
    if val.starts_with('[') && val.ends_with(']') && val.len() > 2 {
        return Some(val[1..val.len() - 1].replace('_', " "));
    }
    None
}

/// Resolves a value that can be a spacing scale token or an arbitrary `[value]`.
fn resolve_spacing_or_arbitrary(val: &str) -> Option<String> {
    arbitrary_value(val).or_else(|| spacing::spacing_value(val))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_classes() {
        let rule = resolve_class("flex").unwrap();
        assert_eq!(rule.selector, ".flex");
        assert_eq!(rule.declarations, vec![("display".into(), "flex".into())]);

        let rule = resolve_class("hidden").unwrap();
        assert_eq!(rule.declarations, vec![("display".into(), "none".into())]);
    }

    #[test]
    fn flex_direction() {
        let rule = resolve_class("flex-col").unwrap();
        assert_eq!(
            rule.declarations,
            vec![("flex-direction".into(), "column".into())]
        );
    }

    #[test]
    fn grid_cols() {
        let rule = resolve_class("grid-cols-3").unwrap();
        assert_eq!(
            rule.declarations,
            vec![(
                "grid-template-columns".into(),
                "repeat(3, minmax(0, 1fr))".into()
            )]
        );
        assert!(resolve_class("grid-cols-0").is_none());
    }

    #[test]
    fn padding_scale() {
        let rule = resolve_class("p-4").unwrap();
        assert_eq!(rule.selector, ".p-4");
        assert_eq!(rule.declarations, vec![("padding".into(), "1rem".into())]);
    }

    #[test]
    fn padding_directional() {
        let rule = resolve_class("px-8").unwrap();
        assert!(rule
            .declarations
            .contains(&("padding-left".into(), "2rem".into())));
        assert!(rule
            .declarations
            .contains(&("padding-right".into(), "2rem".into())));
    }

    #[test]
    fn margin_auto() {
        let rule = resolve_class("mx-auto").unwrap();
        assert!(rule
            .declarations
            .contains(&("margin-left".into(), "auto".into())));
        assert!(rule
            .declarations
            .contains(&("margin-right".into(), "auto".into())));
    }

    #[test]
    fn negative_margin() {
        let rule = resolve_class("-m-4").unwrap();
        assert_eq!(rule.declarations, vec![("margin".into(), "-1rem".into())]);
    }

    #[test]
    fn negative_padding_rejected() {
        assert!(resolve_class("-p-4").is_none());
    }

    #[test]
    fn width_fraction() {
        let rule = resolve_class("w-1/2").unwrap();
        assert_eq!(rule.selector, r".w-1\/2");
        assert_eq!(rule.declarations, vec![("width".into(), "50%".into())]);
    }

    #[test]
    fn width_full() {
        let rule = resolve_class("w-full").unwrap();
        assert_eq!(rule.declarations, vec![("width".into(), "100%".into())]);
    }

    #[test]
    fn max_width_container() {
        let rule = resolve_class("max-w-4xl").unwrap();
        assert_eq!(rule.declarations, vec![("max-width".into(), "56rem".into())]);
    }

    #[test]
    fn bg_color() {
        let rule = resolve_class("bg-blue-500").unwrap();
        assert_eq!(
            rule.declarations,
            vec![("background-color".into(), "#3b82f6".into())]
        );
    }

    #[test]
    fn bg_color_with_opacity() {
        let rule = resolve_class("bg-blue-500/50").unwrap();
        let val = &rule.declarations[0].1;
        assert!(val.starts_with("rgba("), "expected rgba, got {}", val);
    }

    #[test]
    fn text_color_and_size_disambiguation() {
        let rule = resolve_class("text-white").unwrap();
        assert_eq!(rule.declarations, vec![("color".into(), "#ffffff".into())]);

        let rule = resolve_class("text-sm").unwrap();
        assert_eq!(rule.declarations[0].0, "font-size");

        let rule = resolve_class("text-center").unwrap();
        assert_eq!(rule.declarations[0].0, "text-align");
    }

    #[test]
    fn border_color() {
        let rule = resolve_class("border-gray-200").unwrap();
        assert_eq!(
            rule.declarations,
            vec![("border-color".into(), "#e5e7eb".into())]
        );
    }

    #[test]
    fn gap() {
        let rule = resolve_class("gap-4").unwrap();
        assert_eq!(rule.declarations, vec![("gap".into(), "1rem".into())]);
    }

    #[test]
    fn rounded() {
        let rule = resolve_class("rounded-lg").unwrap();
        assert_eq!(
            rule.declarations,
            vec![("border-radius".into(), "0.5rem".into())]
        );
    }

    #[test]
    fn arbitrary_width() {
        let rule = resolve_class("w-[100px]").unwrap();
        assert_eq!(rule.declarations, vec![("width".into(), "100px".into())]);
    }

    #[test]
    fn opacity() {
        let rule = resolve_class("opacity-50").unwrap();
        assert_eq!(rule.declarations, vec![("opacity".into(), "0.5".into())]);
    }

    #[test]
    fn size_shorthand() {
        let rule = resolve_class("size-8").unwrap();
        assert_eq!(rule.declarations.len(), 2);
    }

    #[test]
    fn unknown_class_returns_none() {
        assert!(resolve_class("nonexistent-class-xyz").is_none());
    }

    #[test]
    fn escape_selector_fraction() {
        assert_eq!(escape_selector("w-1/2"), r"w-1\/2");
    }

    #[test]
    fn escape_selector_decimal() {
        assert_eq!(escape_selector("p-0.5"), r"p-0\.5");
    }
}
