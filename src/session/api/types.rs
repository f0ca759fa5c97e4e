//! Request and response bodies of the remote operations

use serde::{Deserialize, Serialize};

use crate::events::{GroupRequestEvent, NewFriendRequestEvent};

/// Group settings; `None` fields are left unchanged on update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confess_talk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_member_invite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_approve: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_chat: Option<bool>,
}

/// A member's group card and special title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_title: Option<String>,
}

/// Per-session gateway settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_websocket: Option<bool>,
}

/// Answer to a friend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendRequestAction {
    Allow = 0,
    Deny = 1,
    /// Deny and never accept requests from this account again
    DenyAndBlock = 2,
}

/// Answer to a join request or a group invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRequestAction {
    Allow = 0,
    Deny = 1,
    Ignore = 2,
    DenyAndBlock = 3,
    IgnoreAndBlock = 4,
}

/// Identifies the request being answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRef {
    pub event_id: i64,
    pub from_id: i64,
    pub group_id: i64,
}

impl From<&NewFriendRequestEvent> for RequestRef {
    fn from(event: &NewFriendRequestEvent) -> Self {
        RequestRef {
            event_id: event.event_id,
            from_id: event.from_id,
            group_id: event.group_id,
        }
    }
}

impl From<&GroupRequestEvent> for RequestRef {
    fn from(event: &GroupRequestEvent) -> Self {
        RequestRef {
            event_id: event.event_id,
            from_id: event.from_id,
            group_id: event.group_id,
        }
    }
}

/// Kind of conversation an uploaded file will be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Friend,
    Group,
    Temp,
}

impl UploadTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadTarget::Friend => "friend",
            UploadTarget::Group => "group",
            UploadTarget::Temp => "temp",
        }
    }
}

/// An uploaded image, usable in an `Image` message element
///
/// Relayed images have only `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// A voice clip stored on the gateway, usable in a `Voice` message element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedVoice {
    pub voice_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_config_omits_unset_fields() {
        let config = GroupConfig {
            name: Some("new name".into()),
            anonymous_chat: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            serde_json::json!({"name": "new name", "anonymousChat": false})
        );
    }

    #[test]
    fn test_action_codes() {
        assert_eq!(FriendRequestAction::DenyAndBlock as i32, 2);
        assert_eq!(GroupRequestAction::IgnoreAndBlock as i32, 4);
    }
}
