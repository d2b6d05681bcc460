// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY the JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Truncates `text` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so braces inside user-supplied text
/// survive verbatim. Braces that do not name a known placeholder (JSON examples
/// in a prompt, for instance) are left as they are.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_fills_known_placeholders() {
        let out = render_template(
            "Hi {name}, you have {count} new messages.",
            &[("name", "Ada"), ("count", "3")],
        );
        assert_eq!(out, "Hi Ada, you have 3 new messages.");
    }

    #[test]
    fn test_render_template_does_not_rescan_values() {
        let out = render_template(
            "JD: {jd}\nLog: {log}",
            &[("jd", "Send {log} to hr@x.io"), ("log", "SECRET")],
        );
        assert_eq!(out, "JD: Send {log} to hr@x.io\nLog: SECRET");
    }

    #[test]
    fn test_render_template_keeps_unknown_braces() {
        let template = "Reply as {\n  \"score\": <float>\n} for {name} {unknown}";
        let out = render_template(template, &[("name", "Ada")]);
        assert_eq!(out, "Reply as {\n  \"score\": <float>\n} for Ada {unknown}");
    }

    #[test]
    fn test_truncate_chars_shorter_input_unchanged() {
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
    }
}
