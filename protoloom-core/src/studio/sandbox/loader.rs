//! Normalizes extracted source into directly executable sandbox code.
//! The sandbox has no module loader, so module syntax the model leaks in
//! from its training data has to go. Transform order is fixed: export
//! tokens, then import lines, then one residual fence layer. Everything
//! else passes through byte-for-byte; syntax stays the supervisor's
//! problem.

/// Prepare `source_text` for evaluation inside the sandbox.
pub fn prepare(source_text: &str) -> String {
    let text = strip_export_tokens(source_text);
    let text = strip_import_lines(&text);
    strip_residual_fence(&text)
}

/// Strips leading `export` / `export default` token sequences.
fn strip_export_tokens(text: &str) -> String {
    let mut rest = text;
    loop {
        let lead = rest.trim_start();
        if let Some(r) = lead.strip_prefix("export default ") {
            rest = r;
        } else if let Some(r) = lead.strip_prefix("export ") {
            rest = r;
        } else {
            break;
        }
    }
    rest.to_string()
}

/// Drops whole lines that start with an `import` statement.
fn strip_import_lines(text: &str) -> String {
    if !text.contains("import") {
        return text.to_string();
    }
    text.lines()
        .filter(|line| !line.trim_start().starts_with("import "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes one layer of code fencing if the text is still fence-wrapped.
/// The extractor normally unwraps fences already; this covers hand-edited
/// source pasted fence and all.
fn strip_residual_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return text.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    lines.remove(0);
    if lines.last().map(|l| l.trim() == "```").unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_export_default_and_is_otherwise_byte_identical() {
        let body = "function GeneratedComponent()\n    return h(\"div\", {}, {})\nend";
        let input = format!("export default {}", body);
        assert_eq!(prepare(&input), body);
    }

    #[test]
    fn strips_bare_export() {
        assert_eq!(prepare("export local x = 1"), "local x = 1");
    }

    #[test]
    fn strips_stacked_export_tokens() {
        assert_eq!(prepare("export default export local x = 1"), "local x = 1");
    }

    #[test]
    fn strips_import_lines_entirely() {
        let input = "import { Heart } from \"lucide\";\nfunction GeneratedComponent()\n    return h(\"div\", {}, {})\nend";
        let output = prepare(input);
        assert!(!output.contains("import"));
        assert!(output.starts_with("function GeneratedComponent"));
    }

    #[test]
    fn unwraps_residual_fence() {
        let input = "```luau\nlocal x = 1\nreturn x\n```";
        assert_eq!(prepare(input), "local x = 1\nreturn x");
    }

    #[test]
    fn plain_code_passes_through_unchanged() {
        let input = "function GeneratedComponent()\n    -- an important comment\n    return h(\"div\", {}, {})\nend";
        assert_eq!(prepare(input), input);
    }

    #[test]
    fn export_inside_body_is_untouched() {
        let input = "function GeneratedComponent()\n    local export = 1\n    return export\nend";
        assert_eq!(prepare(input), input);
    }
}
