//! Frame decoding

use serde_json::Value;

use super::catalogue::{decoder_for, Event};
use super::types::{CommandExecutedEvent, UnknownEvent};
use crate::error::{Error, Result};

/// Decode one complete frame from the all-events stream
///
/// Frames whose `type` has no registered decoder become [`Event::Unknown`]
/// holding `text` unchanged. A frame that is not a JSON object with a string
/// `type`, or whose payload does not fit its registered type, is a protocol
/// error.
pub fn decode_event(text: &str) -> Result<Event> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| Error::Protocol(format!("frame is not JSON: {}", e)))?;

    let discriminator = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Protocol("frame has no type".to_string()))?
        .to_string();

    match decoder_for(&discriminator) {
        Some(decode) => decode(value)
            .map_err(|e| Error::Protocol(format!("malformed {} frame: {}", discriminator, e))),
        None => Ok(Event::Unknown(UnknownEvent {
            discriminator,
            raw: text.to_string(),
            data: value,
        })),
    }
}

/// Decode one complete frame from the command stream
pub fn decode_command(text: &str) -> Result<Event> {
    let payload: CommandExecutedEvent = serde_json::from_str(text)
        .map_err(|e| Error::Protocol(format!("malformed command frame: {}", e)))?;
    Ok(Event::CommandExecuted(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, GroupPermission};

    const GROUP_MESSAGE: &str = r#"{
        "type": "GroupMessage",
        "messageChain": [{"type":"Source","id":123,"time":0},{"type":"Plain","text":"hi"}],
        "sender": {
            "id": 42,
            "memberName": "alice",
            "permission": "MEMBER",
            "group": {"id": 7, "name": "g", "permission": "ADMINISTRATOR"}
        }
    }"#;

    #[test]
    fn test_decode_registered_event() {
        let event = decode_event(GROUP_MESSAGE).unwrap();
        assert_eq!(event.kind(), EventKind::GroupMessage);
        match event {
            Event::GroupMessage(msg) => {
                assert_eq!(msg.sender.id, 42);
                assert_eq!(msg.sender.group.permission, GroupPermission::Administrator);
                assert_eq!(msg.message_chain.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shared_payload_keeps_its_channel() {
        let online = decode_event(r#"{"type":"BotOnlineEvent","qq":1}"#).unwrap();
        let relogin = decode_event(r#"{"type":"BotReloginEvent","qq":1}"#).unwrap();
        assert_eq!(online.kind(), EventKind::BotOnline);
        assert_eq!(relogin.kind(), EventKind::BotRelogin);
    }

    #[test]
    fn test_unknown_discriminator_keeps_raw_text() {
        let text = r#"{"type":"NotARealType",  "x": [1, 2]}"#;
        match decode_event(text).unwrap() {
            Event::Unknown(unknown) => {
                assert_eq!(unknown.discriminator, "NotARealType");
                assert_eq!(unknown.raw, text);
                assert_eq!(unknown.data["x"][1], 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_frames_are_protocol_errors() {
        assert!(matches!(decode_event("not json"), Err(Error::Protocol(_))));
        assert!(matches!(decode_event(r#"{"qq":1}"#), Err(Error::Protocol(_))));
        assert!(matches!(
            decode_event(r#"{"type":"BotOnlineEvent","qq":"nope"}"#),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_command_frames() {
        let event = decode_command(r#"{"name":"help","friend":5,"args":["a"]}"#).unwrap();
        match event {
            Event::CommandExecuted(cmd) => {
                assert_eq!(cmd.name, "help");
                assert_eq!(cmd.friend, 5);
                assert!(cmd.member.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_every_kind_has_a_distinct_discriminator() {
        let mut seen = std::collections::HashSet::new();
        for kind in EventKind::ALL {
            assert!(seen.insert(kind.as_str()), "duplicate {}", kind);
        }
    }
}
