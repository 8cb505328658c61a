//! Identifier and payload types
//!
//! Identifiers are opaque strings handed out by Klarna. They are never
//! validated or percent-encoded: an empty identifier yields an empty path
//! segment, and `/`, `..`, `?` or `#` inside an identifier go into the URL
//! as-is.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{KlarnaError, KlarnaResult};

/// JSON object sent as a request body, passed through unmodified
pub type RequestPayload = Map<String, Value>;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Klarna order identifier
    OrderId
);

string_id!(
    /// Capture identifier, scoped to an order
    CaptureId
);

string_id!(
    /// Refund identifier, scoped to an order
    RefundId
);

/// Build a payload from any value that serializes to a JSON object
pub fn payload_from<T: Serialize>(value: &T) -> KlarnaResult<RequestPayload> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(KlarnaError::InvalidPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
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
    use serde_json::json;

    #[test]
    fn test_id_display_and_conversions() {
        let order_id = OrderId::new("ord_1");
        assert_eq!(order_id.as_str(), "ord_1");
        assert_eq!(order_id.to_string(), "ord_1");
        assert_eq!(OrderId::from("ord_1"), order_id);
        assert_eq!(CaptureId::from("cap_9".to_string()).as_str(), "cap_9");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let refund_id = RefundId::new("ref_3");
        assert_eq!(serde_json::to_value(&refund_id).unwrap(), json!("ref_3"));
    }

    #[test]
    fn test_payload_from_object() {
        #[derive(Serialize)]
        struct Refund {
            refunded_amount: u64,
            description: &'static str,
        }

        let payload = payload_from(&Refund {
            refunded_amount: 500,
            description: "damaged",
        })
        .unwrap();

        assert_eq!(payload.get("refunded_amount"), Some(&json!(500)));
        assert_eq!(payload.get("description"), Some(&json!("damaged")));
    }

    #[test]
    fn test_payload_from_rejects_non_object() {
        let result = payload_from(&vec![1, 2, 3]);
        assert!(matches!(result, Err(KlarnaError::InvalidPayload(_))));
    }
}
