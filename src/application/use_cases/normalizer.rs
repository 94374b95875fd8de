//! Canonicalization of loosely-typed provider records.
//!
//! The upstream generator is prompted for a fixed JSON schema, but the same
//! logical field arrives as a string in one response and an array in the
//! next. The coercion policy lives here, once, so every consumer can assume
//! canonical types.

use crate::domain::competitor::Competitor;
use crate::domain::sentinel::Sentinel;
use serde_json::Value;

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// String-or-array field to a single string. Arrays join their non-empty
/// entries with `", "`; empty, absent and null all become `"N/A"`.
pub fn string_or_list(value: Option<&Value>) -> String {
    let joined = match value {
        Some(Value::Array(items)) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_string).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Some(other) => value_to_string(other),
        None => None,
    };
    joined.unwrap_or_else(|| Sentinel::NoData.as_str().to_string())
}

/// List field to `Vec<String>`. Absent or non-array input becomes an empty
/// vec, never null.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        _ => Vec::new(),
    }
}

/// Category list: trim, lowercase, drop empties, dedup with first occurrence
/// winning.
pub fn category_list(value: Option<&Value>) -> Vec<String> {
    let mut categories = Vec::new();
    if let Some(Value::Array(items)) = value {
        for item in items {
            if let Some(entry) = value_to_string(item) {
                let lowered = entry.to_lowercase();
                if !categories.contains(&lowered) {
                    categories.push(lowered);
                }
            }
        }
    }
    categories
}

/// URL field to an absolute https URL, or `None` for empty/null input.
/// Percent-decoding failure keeps the trimmed original rather than failing
/// the record.
pub fn canonical_url(value: Option<&Value>) -> Option<String> {
    let raw = value.and_then(value_to_string)?;
    let decoded = urlencoding::decode(&raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.clone());
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else if trimmed.starts_with("//") {
        Some(format!("https:{}", trimmed))
    } else {
        Some(format!("https://{}", trimmed))
    }
}

/// Identity field. Missing names get the placeholder; callers filter those
/// records out of final collections.
pub fn display_name(value: Option<&Value>) -> String {
    value
        .and_then(value_to_string)
        .unwrap_or_else(|| Sentinel::UnknownName.as_str().to_string())
}

pub fn normalize_competitor(value: &Value) -> Competitor {
    Competitor {
        name: display_name(value.get("name")),
        website: canonical_url(value.get("website")),
        facebook_url: canonical_url(value.get("facebookUrl")),
        services: string_list(value.get("services")),
        service_categories: category_list(value.get("serviceCategories")),
        pricing: string_or_list(value.get("pricing")),
        target_audience: string_or_list(value.get("targetAudience")),
        usp: string_or_list(value.get("usp")),
        brand_tone: string_or_list(value.get("brandTone")),
        strengths: string_list(value.get("strengths")),
        weaknesses: string_list(value.get("weaknesses")),
        complaints: string_list(value.get("complaints")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::response::{parse_provider_payload, ParsedPayload};
    use serde_json::json;

    #[test]
    fn test_string_field_kept_as_is() {
        assert_eq!(string_or_list(Some(&json!("Premium tier"))), "Premium tier");
    }

    #[test]
    fn test_array_field_joined_with_comma() {
        let value = json!(["฿100", "฿200"]);
        assert_eq!(
            string_or_list(Some(&value)),
            "฿100, ฿200"
        );
    }

    #[test]
    fn test_missing_field_becomes_placeholder() {
        assert_eq!(string_or_list(None), "N/A");
        assert_eq!(string_or_list(Some(&Value::Null)), "N/A");
        assert_eq!(string_or_list(Some(&json!(""))), "N/A");
        assert_eq!(string_or_list(Some(&json!([]))), "N/A");
    }

    #[test]
    fn test_list_field_defaults_to_empty() {
        assert_eq!(string_list(None), Vec::<String>::new());
        assert_eq!(string_list(Some(&json!("not a list"))), Vec::<String>::new());
        assert_eq!(
            string_list(Some(&json!(["a", "", " b "]))),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_categories_lowercased_and_deduped() {
        let value = json!(["Web", " web ", "APP"]);
        assert_eq!(
            category_list(Some(&value)),
            vec!["web".to_string(), "app".to_string()]
        );
    }

    #[test]
    fn test_url_without_scheme_gets_https() {
        assert_eq!(
            canonical_url(Some(&json!("acme.example.com"))),
            Some("https://acme.example.com".to_string())
        );
    }

    #[test]
    fn test_protocol_relative_url_gets_https_scheme() {
        assert_eq!(
            canonical_url(Some(&json!("//cdn.example.com/a.png"))),
            Some("https://cdn.example.com/a.png".to_string())
        );
    }

    #[test]
    fn test_url_with_scheme_kept() {
        assert_eq!(
            canonical_url(Some(&json!("http://acme.example.com"))),
            Some("http://acme.example.com".to_string())
        );
    }

    #[test]
    fn test_percent_encoded_url_decoded() {
        assert_eq!(
            canonical_url(Some(&json!("https://example.com/a%20b"))),
            Some("https://example.com/a b".to_string())
        );
    }

    #[test]
    fn test_undecodable_url_kept_verbatim() {
        // %FF is not valid UTF-8 after decoding; the trimmed original wins.
        assert_eq!(
            canonical_url(Some(&json!("https://example.com/%FF"))),
            Some("https://example.com/%FF".to_string())
        );
    }

    #[test]
    fn test_null_url_stays_null() {
        assert_eq!(canonical_url(None), None);
        assert_eq!(canonical_url(Some(&Value::Null)), None);
        assert_eq!(canonical_url(Some(&json!(""))), None);
    }

    #[test]
    fn test_missing_name_gets_placeholder() {
        let competitor = normalize_competitor(&json!({"pricing": "free"}));
        assert_eq!(competitor.name, "Unknown Competitor");
        assert!(competitor.is_placeholder());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize_competitor(&json!({
            "name": "Acme",
            "website": "acme.example.com",
            "facebookUrl": null,
            "services": ["SEO", "Ads"],
            "serviceCategories": ["Web", "WEB", "app"],
            "pricing": ["฿100", "฿200"],
            "targetAudience": "SMBs",
            "strengths": ["fast"],
        }));

        let round_tripped = serde_json::to_value(&first).expect("competitor serializes");
        let second = normalize_competitor(&round_tripped);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fenced_array_payload_normalizes_end_to_end() {
        let raw = "```json\n[{\"name\":\"Acme\",\"pricing\":[\"฿100\",\"฿200\"]}]\n```";
        let value = match parse_provider_payload(raw) {
            ParsedPayload::Value(value) => value,
            other => panic!("expected parsed payload, got {:?}", other),
        };

        let competitor = normalize_competitor(&value);
        assert_eq!(competitor.name, "Acme");
        assert_eq!(competitor.pricing, "฿100, ฿200");
        assert_eq!(competitor.target_audience, "N/A");
        assert_eq!(competitor.usp, "N/A");
        assert_eq!(competitor.brand_tone, "N/A");
        assert_eq!(competitor.website, None);
        assert!(competitor.services.is_empty());
        assert!(competitor.strengths.is_empty());
    }
}
