use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

static TRAILING_COMMA_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Outcome of parsing a provider payload. Generative and workflow services
/// return text that is not a validated wire format, so parse failures are data
/// rather than errors: callers pattern-match instead of unwrapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload {
    Value(Value),
    Invalid { error: String, raw: String },
}

impl ParsedPayload {
    pub fn is_invalid(&self) -> bool {
        matches!(self, ParsedPayload::Invalid { .. })
    }
}

/// Reduces raw provider text to a parse candidate.
///
/// Providers wrap JSON in markdown fences or surround it with prose; this
/// strips a leading/trailing fence, or falls back to the greedy `{...}` span,
/// or returns the trimmed text unchanged so the parser can reject it.
pub fn unwrap_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("```") {
        return strip_code_fence(trimmed);
    }
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }
    trimmed.to_string()
}

/// Some providers wrap a singleton result in an array; element 0 is the
/// payload. Anything else passes through unchanged.
pub fn unwrap_value(value: Value) -> Value {
    match value {
        Value::Array(mut items) if !items.is_empty() => items.remove(0),
        other => other,
    }
}

/// Strict parse, then one bounded repair pass, then a structured failure.
/// Never panics and never returns `Err`; call sites always get a value they
/// can match on. Repairs, in order: trailing commas before `}`/`]` removed,
/// embedded literal newlines flattened to spaces.
pub fn parse_with_repair(candidate: &str) -> ParsedPayload {
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return ParsedPayload::Value(value);
    }

    let repaired = flatten_newlines(&strip_trailing_commas(candidate));
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => ParsedPayload::Value(value),
        Err(err) => {
            warn!(error = %err, raw = candidate, "payload is not valid JSON after repair");
            ParsedPayload::Invalid {
                error: "Invalid JSON".to_string(),
                raw: candidate.to_string(),
            }
        }
    }
}

/// Full pipeline for one provider response: unwrap text, parse with repair,
/// unwrap a singleton array.
pub fn parse_provider_payload(raw: &str) -> ParsedPayload {
    match parse_with_repair(&unwrap_text(raw)) {
        ParsedPayload::Value(value) => ParsedPayload::Value(unwrap_value(value)),
        invalid => invalid,
    }
}

fn strip_code_fence(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    if !lines.is_empty() {
        lines.remove(0);
    }
    while let Some(last) = lines.last() {
        if last.trim().is_empty() {
            lines.pop();
            continue;
        }
        if last.trim_start().starts_with("```") {
            lines.pop();
        }
        break;
    }
    lines.join("\n").trim().to_string()
}

fn strip_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_PATTERN.replace_all(text, "$1").to_string()
}

fn flatten_newlines(text: &str) -> String {
    text.replace('\n', " ").replace('\r', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json_parsed_unchanged() {
        let parsed = parse_with_repair(r#"{"a": 1, "b": "x"}"#);
        assert_eq!(parsed, ParsedPayload::Value(json!({"a": 1, "b": "x"})));
    }

    #[test]
    fn test_trailing_comma_in_object_repaired() {
        let parsed = parse_with_repair(r#"{"a":1,}"#);
        assert_eq!(parsed, ParsedPayload::Value(json!({"a": 1})));
    }

    #[test]
    fn test_trailing_comma_in_array_repaired() {
        let parsed = parse_with_repair(r#"[1, 2, 3,]"#);
        assert_eq!(parsed, ParsedPayload::Value(json!([1, 2, 3])));
    }

    #[test]
    fn test_embedded_newline_in_string_repaired() {
        let parsed = parse_with_repair("{\"note\": \"line one\nline two\"}");
        assert_eq!(
            parsed,
            ParsedPayload::Value(json!({"note": "line one line two"}))
        );
    }

    #[test]
    fn test_unrepairable_text_yields_invalid_with_raw() {
        let parsed = parse_with_repair("certainly, here is the data you asked for");
        match parsed {
            ParsedPayload::Invalid { error, raw } => {
                assert_eq!(error, "Invalid JSON");
                assert_eq!(raw, "certainly, here is the data you asked for");
            }
            other => panic!("expected invalid payload, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_string_is_invalid_not_panic() {
        assert!(parse_provider_payload("").is_invalid());
    }

    #[test]
    fn test_fence_with_language_tag_stripped() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(unwrap_text(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_fence_without_language_tag_stripped() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(unwrap_text(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_brace_span_extracted_from_prose() {
        let raw = "Here is the analysis: {\"a\": 1} hope it helps!";
        assert_eq!(unwrap_text(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_no_fence_no_braces_passes_through_trimmed() {
        assert_eq!(unwrap_text("  just prose  "), "just prose");
    }

    #[test]
    fn test_singleton_array_unwraps_to_element() {
        assert_eq!(unwrap_value(json!([{"a": 1}])), json!({"a": 1}));
    }

    #[test]
    fn test_bare_object_unwraps_to_itself() {
        assert_eq!(unwrap_value(json!({"a": 1})), json!({"a": 1}));
    }

    #[test]
    fn test_empty_array_passes_through() {
        assert_eq!(unwrap_value(json!([])), json!([]));
    }

    #[test]
    fn test_fenced_array_payload_end_to_end() {
        let raw = "```json\n[{\"name\":\"Acme\",\"pricing\":[\"฿100\",\"฿200\"]}]\n```";
        let parsed = parse_provider_payload(raw);
        assert_eq!(
            parsed,
            ParsedPayload::Value(json!({"name": "Acme", "pricing": ["฿100", "฿200"]}))
        );
    }
}
