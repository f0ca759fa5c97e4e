//! JSON response envelope
//!
//! Every gateway reply is read as text first and then interpreted in one of
//! three shapes:
//!
//! - status only: `{"code": 0, "msg": "success"}`
//! - status + field: `{"code": 0, "session": "..."}`, field present only on 0
//! - bare payload: the body is the value itself (`[...]` or an object without
//!   a `code`); an object carrying a non-zero `code` is still an error

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// One parsed response body
#[derive(Debug, Clone)]
pub struct Envelope {
    raw: String,
    json: Option<Value>,
}

impl Envelope {
    /// Parse a response body; non-JSON bodies are kept raw
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let json = serde_json::from_str(&raw).ok();
        Envelope { raw, json }
    }

    /// The body exactly as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the body parsed as JSON
    pub fn is_json(&self) -> bool {
        self.json.is_some()
    }

    fn json(&self) -> Result<&Value> {
        self.json
            .as_ref()
            .ok_or_else(|| Error::InvalidOperation(self.raw.clone()))
    }

    /// Read the status code
    pub fn code(&self) -> Result<i64> {
        self.json()?
            .get("code")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::UnknownResponse(self.raw.clone()))
    }

    /// Status-only shape: succeed on code 0
    pub fn into_status(self) -> Result<()> {
        match self.code()? {
            0 => Ok(()),
            code => Err(Error::from_status_code(code, &self.raw)),
        }
    }

    /// Status + field shape: on code 0 decode `field`
    pub fn into_field<T: DeserializeOwned>(mut self, field: &str) -> Result<T> {
        match self.code()? {
            0 => {
                let value = self
                    .json
                    .as_mut()
                    .and_then(|v| v.get_mut(field))
                    .map(Value::take)
                    .ok_or_else(|| Error::UnknownResponse(self.raw.clone()))?;
                Ok(serde_json::from_value(value)?)
            }
            code => Err(Error::from_status_code(code, &self.raw)),
        }
    }

    /// Bare payload shape
    ///
    /// An object with `code == 0` and a `data` member yields `data`, so the
    /// same call works against gateways that wrap payloads.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T> {
        let Envelope { raw, json } = self;
        let mut value = json.ok_or_else(|| Error::InvalidOperation(raw.clone()))?;

        if let Some(code) = value.get("code").and_then(Value::as_i64) {
            if code != 0 {
                return Err(Error::from_status_code(code, &raw));
            }
            if let Some(data) = value.get_mut("data") {
                return Ok(serde_json::from_value(data.take())?);
            }
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only() {
        assert!(Envelope::parse(r#"{"code":0,"msg":"success"}"#).into_status().is_ok());
        assert!(matches!(
            Envelope::parse(r#"{"code":10,"msg":"no permission"}"#).into_status(),
            Err(Error::PermissionDenied)
        ));
    }

    #[test]
    fn test_field_present_only_on_success() {
        let key: String = Envelope::parse(r#"{"code":0,"session":"S"}"#)
            .into_field("session")
            .unwrap();
        assert_eq!(key, "S");

        let err = Envelope::parse(r#"{"code":1,"msg":"bad key"}"#)
            .into_field::<String>("session")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAuthKey));
    }

    #[test]
    fn test_non_json_body_is_invalid_operation() {
        let env = Envelope::parse("Internal Server Error");
        assert!(!env.is_json());
        match env.into_status() {
            Err(Error::InvalidOperation(text)) => assert_eq!(text, "Internal Server Error"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_code_carries_raw_body() {
        let raw = r#"{"code":12345,"msg":"?"}"#;
        match Envelope::parse(raw).into_status() {
            Err(Error::UnknownResponse(body)) => assert_eq!(body, raw),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_code_is_unknown_response() {
        assert!(matches!(
            Envelope::parse(r#"{"msg":"hello"}"#).into_status(),
            Err(Error::UnknownResponse(_))
        ));
    }

    #[test]
    fn test_bare_payload() {
        let ids: Vec<i64> = Envelope::parse("[1,2,3]").into_payload().unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        let wrapped: Vec<i64> = Envelope::parse(r#"{"code":0,"data":[4]}"#)
            .into_payload()
            .unwrap();
        assert_eq!(wrapped, vec![4]);

        let err = Envelope::parse(r#"{"code":3,"msg":"session"}"#)
            .into_payload::<Vec<i64>>()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSession));
    }
}
