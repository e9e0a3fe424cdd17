//! Inbound write payloads.
//!
//! The feed route never forwards the client's JSON as-is. A fixed set of
//! fields is lifted out and a fresh body is built from them; anything else
//! the client sent is dropped.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("request body is missing `{0}`")]
    MissingField(&'static str),
}

/// A treat for a unicorn, with the team sending it.
#[derive(Debug, Clone, PartialEq)]
pub struct SnackOrder {
    pub snack: Value,
    pub teamid: Value,
}

impl SnackOrder {
    /// Extract the order from a raw JSON body.
    pub fn from_body(body: &[u8]) -> Result<Self, PayloadError> {
        let Value::Object(mut fields) = serde_json::from_slice::<Value>(body)? else {
            return Err(PayloadError::NotAnObject);
        };

        let snack = fields.remove("snack").ok_or(PayloadError::MissingField("snack"))?;
        let teamid = fields.remove("teamid").ok_or(PayloadError::MissingField("teamid"))?;
        Ok(Self { snack, teamid })
    }

    /// The outbound body: exactly `snack` and `teamid`.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "snack": self.snack,
            "teamid": self.teamid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_are_dropped() {
        let order =
            SnackOrder::from_body(br#"{"snack":"apple","teamid":"t1","extra":"ignored"}"#).unwrap();
        assert_eq!(order.to_json(), json!({"snack": "apple", "teamid": "t1"}));
    }

    #[test]
    fn test_non_string_values_pass_through() {
        let order = SnackOrder::from_body(br#"{"snack":{"kind":"carrot","qty":3},"teamid":7}"#)
            .unwrap();
        assert_eq!(order.snack, json!({"kind": "carrot", "qty": 3}));
        assert_eq!(order.teamid, json!(7));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(matches!(
            SnackOrder::from_body(br#"{"teamid":"t1"}"#),
            Err(PayloadError::MissingField("snack"))
        ));
        assert!(matches!(
            SnackOrder::from_body(br#"{"snack":"apple"}"#),
            Err(PayloadError::MissingField("teamid"))
        ));
    }

    #[test]
    fn test_non_objects_are_rejected() {
        assert!(matches!(
            SnackOrder::from_body(br#"["apple","t1"]"#),
            Err(PayloadError::NotAnObject)
        ));
        assert!(matches!(
            SnackOrder::from_body(b"snack=apple"),
            Err(PayloadError::InvalidJson(_))
        ));
        assert!(matches!(
            SnackOrder::from_body(b""),
            Err(PayloadError::InvalidJson(_))
        ));
    }
}
