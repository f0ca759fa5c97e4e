//! Event payloads
//!
//! Field names follow the gateway's camelCase JSON. Message chains stay as
//! opaque JSON values; see [`MessageChain`](crate::message::MessageChain).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::MessageChain;

/// Permission of an account inside a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupPermission {
    Owner,
    Administrator,
    Member,
}

/// A friend of the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendInfo {
    pub id: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub remark: String,
}

/// A group, with the bot's permission in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub permission: GroupPermission,
}

/// A member of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMemberInfo {
    pub id: i64,
    #[serde(default)]
    pub member_name: String,
    pub permission: GroupPermission,
    pub group: GroupInfo,
}

/// Bot account lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotEvent {
    pub qq: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendMessageEvent {
    pub message_chain: MessageChain,
    pub sender: FriendInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessageEvent {
    pub message_chain: MessageChain,
    pub sender: GroupMemberInfo,
}

/// A private message sent through a group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempMessageEvent {
    pub message_chain: MessageChain,
    pub sender: GroupMemberInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecallEvent {
    pub author_id: i64,
    pub message_id: i64,
    pub time: i64,
    pub group: GroupInfo,
    /// `None` when the bot itself recalled the message
    #[serde(default)]
    pub operator: Option<GroupMemberInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRecallEvent {
    pub author_id: i64,
    pub message_id: i64,
    pub time: i64,
    pub operator: i64,
}

/// The bot's own permission in a group changed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotGroupPermissionChangeEvent {
    pub origin: GroupPermission,
    pub current: GroupPermission,
    pub group: GroupInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMuteEvent {
    pub duration_seconds: i64,
    pub operator: GroupMemberInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotUnmuteEvent {
    pub operator: GroupMemberInfo,
}

/// An event about the bot and one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEvent {
    pub group: GroupInfo,
}

/// A group setting changed from `origin` to `current`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPropertyChange<T> {
    pub origin: T,
    pub current: T,
    pub group: GroupInfo,
    /// `None` when the bot made the change
    #[serde(default)]
    pub operator: Option<GroupMemberInfo>,
}

/// An event about one group member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEvent {
    pub member: GroupMemberInfo,
}

/// A member event caused by somebody else
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberOperatingEvent {
    pub member: GroupMemberInfo,
    #[serde(default)]
    pub operator: Option<GroupMemberInfo>,
}

/// A member attribute changed from `origin` to `current`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPropertyChange<T> {
    pub origin: T,
    pub current: T,
    pub member: GroupMemberInfo,
    #[serde(default)]
    pub operator: Option<GroupMemberInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberMuteEvent {
    pub duration_seconds: i64,
    pub member: GroupMemberInfo,
    #[serde(default)]
    pub operator: Option<GroupMemberInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUnmuteEvent {
    pub member: GroupMemberInfo,
    #[serde(default)]
    pub operator: Option<GroupMemberInfo>,
}

/// Somebody asked to become the bot's friend
///
/// Answer with [`MiraiSession::respond_friend_request`](crate::MiraiSession::respond_friend_request).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFriendRequestEvent {
    pub event_id: i64,
    pub from_id: i64,
    /// Group the request came through, 0 when none
    #[serde(default)]
    pub group_id: i64,
    #[serde(default)]
    pub nick: String,
    #[serde(default)]
    pub message: String,
}

/// A request involving a group: somebody asking to join one, or the bot
/// being invited into one
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequestEvent {
    pub event_id: i64,
    pub from_id: i64,
    pub group_id: i64,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub nick: String,
    #[serde(default)]
    pub message: String,
}

/// A console command ran on the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandExecutedEvent {
    pub name: String,
    /// Friend that sent the command, 0 when it did not come from a friend
    #[serde(default)]
    pub friend: i64,
    /// Group member that sent the command, if any
    #[serde(default)]
    pub member: Option<GroupMemberInfo>,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// A frame whose discriminator has no registered decoder
#[derive(Debug, Clone)]
pub struct UnknownEvent {
    /// Value of the frame's `type` member
    pub discriminator: String,
    /// The frame text exactly as received
    pub raw: String,
    /// The parsed frame
    pub data: Value,
}
