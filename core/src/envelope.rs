//! Generic `{error, result}` response envelope.
//!
//! # Design
//! Decoding is best-effort: a body that is not a JSON object, or an object
//! without an `error` field, decodes to an empty envelope and counts as
//! success. Most endpoints return their own top-level shape and rely on this.
//! The `error` and `result` fields are decoded into a small tagged union
//! instead of being inspected at runtime.

use serde::Deserialize;
use serde_json::Value;

/// A value the marketplace puts in `error` or `result`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl EnvelopeValue {
    /// Render for the composed error message. Numbers lose their fraction.
    pub fn render(&self) -> String {
        match self {
            EnvelopeValue::Number(n) => format!("{n:.0}"),
            EnvelopeValue::Text(s) => s.clone(),
            EnvelopeValue::Other(v) => v.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub error: Option<EnvelopeValue>,
    #[serde(default)]
    pub result: Option<EnvelopeValue>,
}

impl Envelope {
    /// Decode `body`, treating anything that does not fit as an empty envelope.
    ///
    /// Only a JSON object can carry an envelope. Arrays are rejected up front
    /// because serde would otherwise fill the struct fields by position.
    pub fn decode(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// `Error: <error>` followed by `\tResult: <result>` when a result is present.
    pub fn message(&self) -> String {
        let mut message = String::new();
        if let Some(error) = &self.error {
            message.push_str("Error: ");
            message.push_str(&error.render());
        }
        if let Some(result) = &self.result {
            message.push_str("\tResult: ");
            message.push_str(&result.render());
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_error_is_success_whatever_the_result() {
        for body in [
            r#"{}"#,
            r#"{"result":"ok"}"#,
            r#"{"result":1}"#,
            r#"{"result":null,"error":null}"#,
            r#"{"success":true,"ping":"pong"}"#,
        ] {
            let envelope = Envelope::decode(body.as_bytes());
            assert!(envelope.is_success(), "{body}");
        }
    }

    #[test]
    fn empty_envelope_has_empty_message() {
        assert_eq!(Envelope::decode(b"{}").message(), "");
    }

    #[test]
    fn numeric_error_is_rendered_without_fraction() {
        let envelope = Envelope::decode(br#"{"error":404.0}"#);
        assert!(!envelope.is_success());
        assert_eq!(envelope.message(), "Error: 404");

        let envelope = Envelope::decode(br#"{"error":500}"#);
        assert_eq!(envelope.message(), "Error: 500");
    }

    #[test]
    fn text_error_with_text_result() {
        let envelope = Envelope::decode(br#"{"error":"Bad KEY","result":"denied"}"#);
        assert!(!envelope.is_success());
        assert_eq!(envelope.message(), "Error: Bad KEY\tResult: denied");
    }

    #[test]
    fn non_text_error_still_fails() {
        let envelope = Envelope::decode(br#"{"error":{"code":7}}"#);
        assert!(!envelope.is_success());
        assert_eq!(envelope.message(), r#"Error: {"code":7}"#);
    }

    #[test]
    fn non_object_bodies_pass_through_as_success() {
        for body in ["not json", "[1,2,3]", "", "\"error\"", "42", "null"] {
            assert!(Envelope::decode(body.as_bytes()).is_success(), "{body:?}");
        }
    }

    #[test]
    fn short_arrays_are_not_read_positionally() {
        for body in [
            r#"[]"#,
            r#"[{"ui_id":"1"}]"#,
            r#"[{"ui_id":"1"},{"ui_id":"2"}]"#,
            r#"["Bad KEY"]"#,
            r#"["Bad KEY","denied"]"#,
        ] {
            let envelope = Envelope::decode(body.as_bytes());
            assert!(envelope.is_success(), "{body}");
            assert_eq!(envelope.message(), "", "{body}");
        }
    }
}
