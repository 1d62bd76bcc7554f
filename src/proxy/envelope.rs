//! Request body preparation and response translation.
//!
//! Everything here is pure: the shared proxy path feeds raw text in and gets
//! JSON values (or a `ProxyError`) out.

use crate::proxy::routes::{BodyMode, EnvelopeShape};
use crate::proxy::ProxyError;
use axum::http::StatusCode;
use serde_json::{json, Map, Value};

/// Maximum number of characters of a non-JSON backend body shown to clients.
pub const RAW_TEXT_LIMIT: usize = 512;

/// First `RAW_TEXT_LIMIT` characters of a raw body.
pub fn truncate_raw(raw: &str) -> String {
    raw.chars().take(RAW_TEXT_LIMIT).collect()
}

/// Best-effort parse of a backend body.
///
/// Empty bodies become `{}`; non-JSON text is wrapped as `{"detail": <text>}`.
pub fn lenient_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(raw).unwrap_or_else(|_| json!({ "detail": truncate_raw(raw) }))
}

/// Strict parse of a backend body for enveloped routes.
fn strict_body(raw: &str) -> Result<Value, ProxyError> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(raw).map_err(|_| ProxyError::Unparsable(truncate_raw(raw)))
}

/// Client-facing body for a backend response.
///
/// Non-2xx responses are always relayed leniently so backend error details
/// reach the client. 2xx responses are wrapped according to `shape`.
pub fn translate(shape: EnvelopeShape, status: StatusCode, raw: &str) -> Result<Value, ProxyError> {
    if !status.is_success() {
        return Ok(lenient_body(raw));
    }

    match shape {
        EnvelopeShape::Passthrough => Ok(lenient_body(raw)),
        EnvelopeShape::Merge => match strict_body(raw)? {
            Value::Object(fields) => {
                let mut envelope = Map::new();
                envelope.insert("success".to_string(), Value::Bool(true));
                envelope.extend(fields);
                Ok(Value::Object(envelope))
            }
            other => Err(ProxyError::Unparsable(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        },
        EnvelopeShape::Keyed(key) => {
            let data = match strict_body(raw)? {
                Value::Object(mut fields) => fields.remove(key).unwrap_or(Value::Null),
                _ => Value::Null,
            };
            let data = if data.is_null() { json!([]) } else { data };

            Ok(success_with(key, data))
        }
        EnvelopeShape::Wrapped(key) => Ok(success_with(key, strict_body(raw)?)),
    }
}

fn success_with(key: &str, data: Value) -> Value {
    let mut envelope = Map::new();
    envelope.insert("success".to_string(), Value::Bool(true));
    envelope.insert(key.to_string(), data);
    Value::Object(envelope)
}

/// Generic body returned when the backend cannot be reached.
pub fn failure_envelope(shape: EnvelopeShape, message: &str) -> Value {
    match shape {
        EnvelopeShape::Passthrough => json!({ "detail": message }),
        EnvelopeShape::Merge | EnvelopeShape::Keyed(_) | EnvelopeShape::Wrapped(_) => {
            json!({ "success": false, "error": message })
        }
    }
}

/// Body to forward for a body-carrying method.
pub fn prepare_body(mode: BodyMode, raw: &str) -> Result<String, ProxyError> {
    match mode {
        BodyMode::Passthrough => {
            if raw.trim().is_empty() {
                Ok("{}".to_string())
            } else {
                Ok(raw.to_string())
            }
        }
        BodyMode::Json => {
            let value: Value =
                serde_json::from_str(raw).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;
            Ok(value.to_string())
        }
        BodyMode::Select(fields) => {
            let value: Value =
                serde_json::from_str(raw).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;
            let Value::Object(mut object) = value else {
                return Err(ProxyError::InvalidBody(format!(
                    "expected a JSON object, got {}",
                    json_kind(&value)
                )));
            };
            let selected: Map<String, Value> = fields
                .iter()
                .filter_map(|field| object.remove(*field).map(|v| (field.to_string(), v)))
                .collect();
            Ok(Value::Object(selected).to_string())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Lenient Parsing Tests ====================

    #[test]
    fn test_lenient_body_json() {
        assert_eq!(lenient_body(r#"{"items":[1,2]}"#), json!({"items": [1, 2]}));
    }

    #[test]
    fn test_lenient_body_empty() {
        assert_eq!(lenient_body(""), json!({}));
        assert_eq!(lenient_body("  \n"), json!({}));
    }

    #[test]
    fn test_lenient_body_wraps_text() {
        assert_eq!(
            lenient_body("Internal Server Error"),
            json!({"detail": "Internal Server Error"})
        );
    }

    #[test]
    fn test_lenient_body_truncates_to_512_chars() {
        let raw = "é".repeat(600);
        let value = lenient_body(&raw);
        let detail = value["detail"].as_str().unwrap();
        assert_eq!(detail.chars().count(), RAW_TEXT_LIMIT);
    }

    // ==================== Translation Tests ====================

    #[test]
    fn test_passthrough_relays_body() {
        let value = translate(EnvelopeShape::Passthrough, StatusCode::OK, r#"{"calls":[]}"#).unwrap();
        assert_eq!(value, json!({"calls": []}));
    }

    #[test]
    fn test_merge_adds_success_flag() {
        let value = translate(EnvelopeShape::Merge, StatusCode::OK, r#"{"overview":{"totalCalls":3}}"#).unwrap();
        assert_eq!(value, json!({"success": true, "overview": {"totalCalls": 3}}));
    }

    #[test]
    fn test_merge_rejects_non_object() {
        let result = translate(EnvelopeShape::Merge, StatusCode::OK, "[1,2]");
        assert!(matches!(result, Err(ProxyError::Unparsable(_))));
    }

    #[test]
    fn test_keyed_extracts_key() {
        let value = translate(
            EnvelopeShape::Keyed("series"),
            StatusCode::OK,
            r#"{"series":[{"t":"2024-01-15","calls":4}],"extra":true}"#,
        )
        .unwrap();
        assert_eq!(value, json!({"success": true, "series": [{"t": "2024-01-15", "calls": 4}]}));
    }

    #[test]
    fn test_keyed_defaults_to_empty_list() {
        let value = translate(EnvelopeShape::Keyed("topics"), StatusCode::OK, r#"{}"#).unwrap();
        assert_eq!(value, json!({"success": true, "topics": []}));

        let value = translate(EnvelopeShape::Keyed("topics"), StatusCode::OK, r#"{"topics":null}"#).unwrap();
        assert_eq!(value, json!({"success": true, "topics": []}));
    }

    #[test]
    fn test_wrapped_nests_whole_body() {
        let value = translate(
            EnvelopeShape::Wrapped("config"),
            StatusCode::OK,
            r#"{"organizationName":"Ava","aiTemperature":0.4}"#,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({"success": true, "config": {"organizationName": "Ava", "aiTemperature": 0.4}})
        );
    }

    #[test]
    fn test_enveloped_success_with_html_is_unparsable() {
        let result = translate(EnvelopeShape::Keyed("heatmap"), StatusCode::OK, "<html>oops</html>");
        assert!(matches!(result, Err(ProxyError::Unparsable(_))));
    }

    #[test]
    fn test_upstream_error_relayed_verbatim() {
        let value = translate(
            EnvelopeShape::Keyed("anomalies"),
            StatusCode::FORBIDDEN,
            r#"{"detail":"Not allowed"}"#,
        )
        .unwrap();
        assert_eq!(value, json!({"detail": "Not allowed"}));
    }

    // ==================== Failure Envelope Tests ====================

    #[test]
    fn test_failure_envelopes() {
        assert_eq!(
            failure_envelope(EnvelopeShape::Passthrough, "Login service unavailable"),
            json!({"detail": "Login service unavailable"})
        );
        assert_eq!(
            failure_envelope(EnvelopeShape::Keyed("series"), "Failed"),
            json!({"success": false, "error": "Failed"})
        );
    }

    // ==================== Body Preparation Tests ====================

    #[test]
    fn test_passthrough_blank_body_becomes_empty_object() {
        assert_eq!(prepare_body(BodyMode::Passthrough, "").unwrap(), "{}");
        assert_eq!(prepare_body(BodyMode::Passthrough, "   ").unwrap(), "{}");
        assert_eq!(prepare_body(BodyMode::Passthrough, "not json").unwrap(), "not json");
    }

    #[test]
    fn test_json_body_must_parse() {
        assert!(prepare_body(BodyMode::Json, r#"{"email":"a@b.c"}"#).is_ok());
        assert!(matches!(
            prepare_body(BodyMode::Json, "{email"),
            Err(ProxyError::InvalidBody(_))
        ));
        assert!(prepare_body(BodyMode::Json, "").is_err());
    }

    #[test]
    fn test_select_keeps_only_listed_fields() {
        let body = prepare_body(
            BodyMode::Select(&["a", "b"]),
            r#"{"a":true,"c":"drop me","b":false}"#,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({"a": true, "b": false}));
    }

    #[test]
    fn test_select_rejects_non_object() {
        assert!(prepare_body(BodyMode::Select(&["a"]), "[1]").is_err());
    }
}
