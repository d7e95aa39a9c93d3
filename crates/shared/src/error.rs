use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body the parsing service returns alongside a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ServiceErrorBody {
    /// Human-readable detail, if the service sent one.
    ///
    /// String details are returned as-is; structured details (validation
    /// error lists) are returned as their compact JSON text.
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_returned_verbatim() {
        let body: ServiceErrorBody =
            serde_json::from_str(r#"{"detail":"File size exceeds 10MB limit"}"#).expect("body");
        assert_eq!(
            body.detail_message().as_deref(),
            Some("File size exceeds 10MB limit")
        );
    }

    #[test]
    fn missing_or_blank_detail_yields_none() {
        let body: ServiceErrorBody = serde_json::from_str("{}").expect("body");
        assert!(body.detail_message().is_none());
        let body: ServiceErrorBody = serde_json::from_str(r#"{"detail":"  "}"#).expect("body");
        assert!(body.detail_message().is_none());
        let body: ServiceErrorBody = serde_json::from_str(r#"{"detail":null}"#).expect("body");
        assert!(body.detail_message().is_none());
    }

    #[test]
    fn structured_detail_is_rendered_as_json_text() {
        let body: ServiceErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#)
                .expect("body");
        let message = body.detail_message().expect("detail");
        assert!(message.contains("field required"));
    }
}
