//! Provider response classification.
//!
//! Every provider responds with JSON carrying an integer `code` and, on
//! success, a per-kind payload field. Classification is an explicit
//! discriminated parse per resource kind: a "no value" outcome is typed and
//! distinct from "value present but empty", and both are failures.

use aria_core::ResourceKind;
use serde_json::Value;

use crate::error::{ResolveError, Result};

/// Recognized success codes.
const SUCCESS_CODES: [i64; 2] = [0, 200];

/// Classify a provider response body.
///
/// On a recognized success code the per-kind payload is extracted,
/// normalized and returned; everything else maps onto the error taxonomy.
pub fn classify(provider: &str, body: &Value, kind: ResourceKind) -> Result<String> {
    let code = response_code(body).ok_or_else(|| ResolveError::InvalidBody {
        provider: provider.to_string(),
        detail: "missing or non-numeric `code` field".to_string(),
    })?;

    if SUCCESS_CODES.contains(&code) {
        return match extract_payload(body, kind) {
            Some(value) if !value.trim().is_empty() => Ok(normalize_escaped_slashes(&value)),
            _ => Err(ResolveError::EmptyPayload {
                provider: provider.to_string(),
            }),
        };
    }

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();

    Err(match code {
        403 => ResolveError::AuthFailure {
            provider: provider.to_string(),
        },
        422 => ResolveError::BadRequest {
            provider: provider.to_string(),
        },
        429 => ResolveError::RateLimited {
            provider: provider.to_string(),
        },
        other => ResolveError::ProviderFailure {
            provider: provider.to_string(),
            code: other,
            message,
        },
    })
}

/// Extract the payload for an aggregator response.
///
/// Aggregators carry no `code` field; a missing payload is the only failure
/// signal they give.
pub fn extract_aggregator_payload(provider: &str, body: &Value, kind: ResourceKind) -> Result<String> {
    match extract_payload(body, kind) {
        Some(value) if !value.trim().is_empty() => Ok(normalize_escaped_slashes(&value)),
        _ => Err(ResolveError::EmptyPayload {
            provider: provider.to_string(),
        }),
    }
}

/// The `code` field, coerced from a JSON number or numeric string.
fn response_code(body: &Value) -> Option<i64> {
    match body.get("code")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Per-kind discriminated payload lookup.
fn extract_payload(body: &Value, kind: ResourceKind) -> Option<String> {
    let field = |value: &Value, name: &str| value.get(name).and_then(Value::as_str).map(String::from);
    let nested = |name: &str| body.get("data").and_then(|data| field(data, name));

    match kind {
        ResourceKind::Url => field(body, "url")
            .or_else(|| nested("url"))
            // Some providers put the URL directly in `data`
            .or_else(|| field(body, "data")),
        ResourceKind::Pic => field(body, "pic")
            .or_else(|| nested("pic"))
            .or_else(|| field(body, "url"))
            .or_else(|| nested("url")),
        ResourceKind::Lyric => field(body, "lyric").or_else(|| nested("lyric")),
    }
}

/// Normalize escaped path separators (`\/`) to `/`.
pub fn normalize_escaped_slashes(value: &str) -> String {
    value.replace("\\/", "/")
}

/// Unwrap lyric payloads that arrive as a single-line JSON blob.
///
/// Some providers wrap the lyric text in a nested JSON document. Anything
/// that already looks like lyric text (contains a newline) or fails to
/// parse passes through untouched.
pub fn preprocess_lyric(lyric: String) -> String {
    if lyric.contains('\n') {
        return lyric;
    }
    match serde_json::from_str::<Value>(&lyric) {
        Ok(parsed) => parsed
            .get("lyric")
            .and_then(Value::as_str)
            .or_else(|| {
                parsed
                    .get("data")
                    .and_then(|data| data.get("lyric"))
                    .and_then(Value::as_str)
            })
            .map(String::from)
            .unwrap_or(lyric),
        Err(_) => lyric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_with_url() {
        let body = json!({"code": 200, "url": "https://host/a.mp3"});
        let url = classify("p", &body, ResourceKind::Url).unwrap();
        assert_eq!(url, "https://host/a.mp3");
    }

    #[test]
    fn success_code_zero_with_data_field() {
        let body = json!({"code": 0, "data": "https://host/b.flac"});
        let url = classify("p", &body, ResourceKind::Url).unwrap();
        assert_eq!(url, "https://host/b.flac");
    }

    #[test]
    fn escaped_slashes_are_normalized() {
        // Payload string literally containing backslash-slash sequences.
        let body = json!({"code": 200, "url": "https:\\/\\/host\\/a.mp3"});
        let url = classify("p", &body, ResourceKind::Url).unwrap();
        assert_eq!(url, "https://host/a.mp3");
    }

    #[test]
    fn numeric_string_code_accepted() {
        let body = json!({"code": "200", "url": "https://host/a.mp3"});
        assert!(classify("p", &body, ResourceKind::Url).is_ok());
    }

    #[test]
    fn success_with_empty_payload_is_typed_failure() {
        let body = json!({"code": 200, "url": ""});
        let err = classify("p", &body, ResourceKind::Url).unwrap_err();
        assert!(matches!(err, ResolveError::EmptyPayload { .. }));

        let body = json!({"code": 0});
        let err = classify("p", &body, ResourceKind::Url).unwrap_err();
        assert!(matches!(err, ResolveError::EmptyPayload { .. }));
    }

    #[test]
    fn error_codes_map_to_taxonomy() {
        let cases = [
            (403, "auth"),
            (422, "bad request"),
            (429, "rate limited"),
        ];
        for (code, _) in cases {
            let body = json!({"code": code});
            let err = classify("p", &body, ResourceKind::Url).unwrap_err();
            match code {
                403 => assert!(matches!(err, ResolveError::AuthFailure { .. })),
                422 => assert!(matches!(err, ResolveError::BadRequest { .. })),
                429 => assert!(matches!(err, ResolveError::RateLimited { .. })),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn unrecognized_code_carries_message() {
        let body = json!({"code": 502, "message": "upstream broken"});
        let err = classify("p", &body, ResourceKind::Url).unwrap_err();
        match err {
            ResolveError::ProviderFailure { code, message, .. } => {
                assert_eq!(code, 502);
                assert_eq!(message, "upstream broken");
            }
            other => panic!("expected ProviderFailure, got {other:?}"),
        }
    }

    #[test]
    fn missing_code_is_invalid_body() {
        let body = json!({"url": "https://host/a.mp3"});
        let err = classify("p", &body, ResourceKind::Url).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidBody { .. }));
    }

    #[test]
    fn lyric_payload_from_nested_data() {
        let body = json!({"code": 200, "data": {"lyric": "[00:01] la la"}});
        let lyric = classify("p", &body, ResourceKind::Lyric).unwrap();
        assert_eq!(lyric, "[00:01] la la");
    }

    #[test]
    fn pic_falls_back_to_url_fields() {
        let body = json!({"code": 200, "data": {"url": "https://host/cover.jpg"}});
        let pic = classify("p", &body, ResourceKind::Pic).unwrap();
        assert_eq!(pic, "https://host/cover.jpg");
    }

    #[test]
    fn aggregator_payload_without_code() {
        let body = json!({"url": "https://host/a.mp3"});
        let url = extract_aggregator_payload("agg", &body, ResourceKind::Url).unwrap();
        assert_eq!(url, "https://host/a.mp3");

        let body = json!({});
        assert!(extract_aggregator_payload("agg", &body, ResourceKind::Url).is_err());
    }

    #[test]
    fn lyric_preprocessing_unwraps_json_blobs() {
        let wrapped = r#"{"lyric": "[00:01] first line"}"#.to_string();
        assert_eq!(preprocess_lyric(wrapped), "[00:01] first line");

        let plain = "[00:01] first\n[00:05] second".to_string();
        assert_eq!(preprocess_lyric(plain.clone()), plain);

        let not_json = "single line lyric".to_string();
        assert_eq!(preprocess_lyric(not_json.clone()), not_json);
    }
}
