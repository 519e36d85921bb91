//! Tailwind spacing scale: one unit = 0.25rem.

/// Resolve a spacing token (`"4"`, `"0.5"`, `"px"`, `"0"`) to a CSS length.
///
/// Accepts the numeric scale in quarter-rem steps up to 96; anything else
/// returns `None`.
pub fn spacing_value(token: &str) -> Option<String> {
    match token {
        "0" => return Some("0px".to_string()),
        "px" => return Some("1px".to_string()),
        _ => {}
    }

    let units: f64 = token.parse().ok()?;
    if !(0.0..=96.0).contains(&units) {
        return None;
    }
    // Only quarter steps exist on the scale
    if (units * 4.0).fract() != 0.0 {
        return None;
    }

    Some(format_rem(units * 0.25))
}

/// Format a rem value without trailing zeros (`1` → `1rem`, `0.375` → `0.375rem`).
pub fn format_rem(rem: f64) -> String {
    let s = format!("{:.4}", rem);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    format!("{}rem", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_units() {
        assert_eq!(spacing_value("4").as_deref(), Some("1rem"));
        assert_eq!(spacing_value("8").as_deref(), Some("2rem"));
        assert_eq!(spacing_value("96").as_deref(), Some("24rem"));
    }

    #[test]
    fn fractional_units() {
        assert_eq!(spacing_value("0.5").as_deref(), Some("0.125rem"));
        assert_eq!(spacing_value("1.5").as_deref(), Some("0.375rem"));
        assert_eq!(spacing_value("2.5").as_deref(), Some("0.625rem"));
    }

    #[test]
    fn specials() {
        assert_eq!(spacing_value("0").as_deref(), Some("0px"));
        assert_eq!(spacing_value("px").as_deref(), Some("1px"));
    }

    #[test]
    fn rejects_off_scale() {
        assert_eq!(spacing_value("4.3"), None);
        assert_eq!(spacing_value("-4"), None);
        assert_eq!(spacing_value("100"), None);
        assert_eq!(spacing_value("auto"), None);
    }
}
