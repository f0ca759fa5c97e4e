//! Message chains
//!
//! The gateway sends and accepts messages as an array of typed elements
//! (`{"type":"Plain","text":"..."}`, `{"type":"Image",...}` and so on). The
//! element catalogue is not modelled here; a [`MessageChain`] carries the
//! elements as JSON values and only knows enough to validate outgoing chains.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};

/// An ordered list of message elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain(pub Vec<Value>);

impl MessageChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding a single `Plain` element
    pub fn plain(text: impl Into<String>) -> Self {
        MessageChain(vec![json!({ "type": "Plain", "text": text.into() })])
    }

    /// Append an element
    pub fn push(mut self, element: Value) -> Self {
        self.0.push(element);
        self
    }

    /// Append a `Plain` element
    pub fn push_plain(self, text: impl Into<String>) -> Self {
        self.push(json!({ "type": "Plain", "text": text.into() }))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn elements(&self) -> &[Value] {
        &self.0
    }

    /// Concatenated text of every `Plain` element
    pub fn text(&self) -> String {
        self.0
            .iter()
            .filter(|e| element_type(e) == Some("Plain"))
            .filter_map(|e| e.get("text").and_then(Value::as_str))
            .collect()
    }

    /// Id of the `Source` element the gateway attaches to inbound messages
    pub fn source_id(&self) -> Option<i64> {
        self.0
            .iter()
            .find(|e| element_type(e) == Some("Source"))
            .and_then(|e| e.get("id"))
            .and_then(Value::as_i64)
    }

    /// Copy of the chain with `Source` elements removed, ready to send back
    pub fn without_source(&self) -> MessageChain {
        MessageChain(
            self.0
                .iter()
                .filter(|e| element_type(e) != Some("Source"))
                .cloned()
                .collect(),
        )
    }

    /// Check that the chain can be sent
    ///
    /// A sendable chain is non-empty, has no `Source` or `Quote` elements
    /// (quoting goes through the `quote` argument), and is not made only of
    /// empty `Plain` elements.
    pub fn validate_outgoing(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::InvalidInput(
                "message chain must contain at least one element".to_string(),
            ));
        }

        for element in &self.0 {
            match element_type(element) {
                Some("Source") => {
                    return Err(Error::InvalidInput(
                        "Source elements cannot be sent".to_string(),
                    ))
                }
                Some("Quote") => {
                    return Err(Error::InvalidInput(
                        "Quote elements cannot be sent, pass a quote id instead".to_string(),
                    ))
                }
                _ => {}
            }
        }

        let all_empty_plain = self.0.iter().all(|e| {
            element_type(e) == Some("Plain")
                && e.get("text").and_then(Value::as_str).unwrap_or("").is_empty()
        });
        if all_empty_plain {
            return Err(Error::InvalidInput(
                "every element of the message chain is empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl From<Vec<Value>> for MessageChain {
    fn from(elements: Vec<Value>) -> Self {
        MessageChain(elements)
    }
}

fn element_type(element: &Value) -> Option<&str> {
    element.get("type").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_chain_is_sendable() {
        let chain = MessageChain::plain("hello").push_plain(" world");
        assert!(chain.validate_outgoing().is_ok());
        assert_eq!(chain.text(), "hello world");
    }

    #[test]
    fn test_rejected_chains() {
        let empty = MessageChain::new();
        let source = MessageChain::plain("x").push(json!({"type":"Source","id":1,"time":0}));
        let quote = MessageChain::new().push(json!({"type":"Quote","id":1}));
        let blank = MessageChain::plain("").push_plain("");

        for chain in [empty, source, quote, blank] {
            assert!(matches!(chain.validate_outgoing(), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_empty_plain_with_image_is_sendable() {
        let chain = MessageChain::plain("").push(json!({"type":"Image","imageId":"{A}.png"}));
        assert!(chain.validate_outgoing().is_ok());
    }

    #[test]
    fn test_source_id() {
        let chain: MessageChain = serde_json::from_str(
            r#"[{"type":"Source","id":99,"time":1},{"type":"Plain","text":"hi"}]"#,
        )
        .unwrap();
        assert_eq!(chain.source_id(), Some(99));
    }
}
