use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{Error, Result};

pub const CREATE_CALL_METHOD: &str = "call.create";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallParams {
    #[serde(rename = "gid")]
    pub meeting_group_id: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
}

/// Body of every create-call request. Built once per run and shared by all tasks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    pub method: String,
    pub params: CallParams,
}

impl RequestEnvelope {
    pub fn create_call<T: Into<String>>(meeting_group_id: T, duration_seconds: u64) -> Self {
        Self {
            method: CREATE_CALL_METHOD.to_string(),
            params: CallParams {
                meeting_group_id: meeting_group_id.into(),
                duration_seconds,
            },
        }
    }
}

/// Servers send the error code either as a JSON number or as a string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(serde_json::Number),
    Text(String),
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::Text(String::new())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{}", n),
            ErrorCode::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RemoteError {
    #[serde(default)]
    pub code: ErrorCode,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ code: {}, message: {} }}", self.code, self.message)
    }
}

/// Reply shape shared by the auth endpoint and the rpc endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteError>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub token: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl ResponseEnvelope {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// A present error wins over every other field.
    pub fn into_result(self) -> Result<String> {
        match self.error {
            Some(RemoteError { code, message }) => Err(Error::RemoteRejected { code, message }),
            None => Ok(self.token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let env = RequestEnvelope::create_call("group-7", 900);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(
            v,
            json!({"method": "call.create", "params": {"gid": "group-7", "duration": 900}})
        );
    }

    #[test]
    fn test_parse_token() {
        let resp = ResponseEnvelope::parse(r#"{"token":"abc123"}"#).unwrap();
        assert!(resp.error.is_none());
        assert_eq!(resp.into_result().unwrap(), "abc123");
    }

    #[test]
    fn test_missing_token_defaults_empty() {
        let resp = ResponseEnvelope::parse(r#"{"result":{"id":1}}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), "");
    }

    #[test]
    fn test_null_token_is_empty() {
        let resp = ResponseEnvelope::parse(r#"{"result":{"id":1},"token":null}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), "");
    }

    #[test]
    fn test_partial_error_is_still_rejected() {
        let resp = ResponseEnvelope::parse(r#"{"error":{"code":500},"token":""}"#).unwrap();
        match resp.into_result() {
            Err(Error::RemoteRejected { code, message }) => {
                assert_eq!(code.to_string(), "500");
                assert_eq!(message, "");
            }
            other => panic!("expected RemoteRejected, got {:?}", other),
        }

        let resp = ResponseEnvelope::parse(r#"{"error":{}}"#).unwrap();
        match resp.into_result() {
            Err(Error::RemoteRejected { code, .. }) => assert_eq!(code, ErrorCode::default()),
            other => panic!("expected RemoteRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_null_error_is_absent() {
        let resp = ResponseEnvelope::parse(r#"{"error":null,"token":"t"}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), "t");
    }

    #[test]
    fn test_error_wins_over_token() {
        let resp = ResponseEnvelope::parse(
            r#"{"error":{"code":401,"message":"bad credentials"},"token":"ignored"}"#,
        )
        .unwrap();
        match resp.into_result() {
            Err(Error::RemoteRejected { code, message }) => {
                assert_eq!(code.to_string(), "401");
                assert_eq!(message, "bad credentials");
            }
            other => panic!("expected RemoteRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_string_error_code() {
        let resp =
            ResponseEnvelope::parse(r#"{"error":{"code":"E_QUOTA","message":"quota"}}"#).unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, ErrorCode::Text("E_QUOTA".into()));
        assert_eq!(err.to_string(), "{ code: E_QUOTA, message: quota }");
    }

    #[test]
    fn test_malformed_body() {
        let err = ResponseEnvelope::parse("<html>502</html>").unwrap_err();
        assert!(matches!(err, Error::DecodeFailure(_)));
    }
}
