/// Extracts all unique CSS class tokens from an HTML string.
///
/// Scans for `class="..."` / `class='...'` attributes and returns each
/// whitespace-separated token exactly once, in order of first appearance.
pub fn extract_classes(html: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut classes = Vec::new();

    let mut rest = html;
    while let Some(pos) = rest.find("class") {
        rest = &rest[pos + "class".len()..];
        let after_eq = match rest.trim_start_matches(' ').strip_prefix('=') {
            Some(r) => r.trim_start_matches(' '),
            None => continue,
        };
        let quote = match after_eq.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => continue,
        };
        let value = &after_eq[1..];
        let Some(end) = value.find(quote) else { break };
        for token in value[..end].split_whitespace() {
            if seen.insert(token.to_string()) {
                classes.push(token.to_string());
            }
        }
        rest = &value[end + 1..];
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_double_quoted() {
        let html = r#"<div class="flex p-4 text-white"></div>"#;
        assert_eq!(extract_classes(html), vec!["flex", "p-4", "text-white"]);
    }

    #[test]
    fn deduplicates_across_elements() {
        let html = r#"<div class="flex p-4"><span class="flex text-sm"></span></div>"#;
        assert_eq!(extract_classes(html), vec!["flex", "p-4", "text-sm"]);
    }

    #[test]
    fn handles_single_quoted() {
        let html = "<div class='bg-blue-500 rounded'></div>";
        assert_eq!(extract_classes(html), vec!["bg-blue-500", "rounded"]);
    }

    #[test]
    fn returns_empty_for_no_classes() {
        let html = "<div id='foo'></div>";
        assert!(extract_classes(html).is_empty());
    }

    #[test]
    fn tolerates_multibyte_text() {
        let html = r#"<div class="flex">héllo — wörld</div>"#;
        assert_eq!(extract_classes(html), vec!["flex"]);
    }

    #[test]
    fn ignores_unquoted_attribute() {
        let html = "<div class=flex></div>";
        assert!(extract_classes(html).is_empty());
    }
}
