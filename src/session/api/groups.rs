//! Contacts and group administration

use std::time::Duration;

use serde_json::json;

use super::types::{GroupConfig, MemberProfile};
use crate::error::{Error, Result};
use crate::events::{FriendInfo, GroupInfo, GroupMemberInfo};
use crate::session::MiraiSession;

/// Message shown to a member removed by [`MiraiSession::kick_member`]
pub const DEFAULT_KICK_MESSAGE: &str = "您已被移出群聊";

const MAX_MUTE: Duration = Duration::from_secs(30 * 24 * 60 * 60);

impl MiraiSession {
    /// `GET /friendList`
    pub async fn friend_list(&self) -> Result<Vec<FriendInfo>> {
        self.get_in_session("friendList", &[]).await?.into_payload()
    }

    /// `GET /groupList`
    pub async fn group_list(&self) -> Result<Vec<GroupInfo>> {
        self.get_in_session("groupList", &[]).await?.into_payload()
    }

    /// `GET /memberList`
    pub async fn member_list(&self, group_id: i64) -> Result<Vec<GroupMemberInfo>> {
        self.get_in_session("memberList", &[("target", group_id.to_string())])
            .await?
            .into_payload()
    }

    /// Mute a member for `duration`, which must be between zero and 30 days
    /// (both exclusive)
    pub async fn mute(&self, member_id: i64, group_id: i64, duration: Duration) -> Result<()> {
        self.active()?;
        if duration.is_zero() || duration >= MAX_MUTE {
            return Err(Error::InvalidInput(format!(
                "mute duration must be between 0 and 30 days, got {:?}",
                duration
            )));
        }

        let body = json!({
            "target": group_id,
            "memberId": member_id,
            "time": duration.as_secs(),
        });
        self.post_in_session("mute", body).await?.into_status()
    }

    pub async fn unmute(&self, member_id: i64, group_id: i64) -> Result<()> {
        let body = json!({ "target": group_id, "memberId": member_id });
        self.post_in_session("unmute", body).await?.into_status()
    }

    /// Mute everybody in a group
    pub async fn mute_all(&self, group_id: i64) -> Result<()> {
        self.post_in_session("muteAll", json!({ "target": group_id }))
            .await?
            .into_status()
    }

    pub async fn unmute_all(&self, group_id: i64) -> Result<()> {
        self.post_in_session("unmuteAll", json!({ "target": group_id }))
            .await?
            .into_status()
    }

    /// Remove a member from a group, showing them `message`
    pub async fn kick(&self, member_id: i64, group_id: i64, message: &str) -> Result<()> {
        let body = json!({ "target": group_id, "memberId": member_id, "msg": message });
        self.post_in_session("kick", body).await?.into_status()
    }

    /// [`kick`](Self::kick) with [`DEFAULT_KICK_MESSAGE`]
    pub async fn kick_member(&self, member_id: i64, group_id: i64) -> Result<()> {
        self.kick(member_id, group_id, DEFAULT_KICK_MESSAGE).await
    }

    /// Make the bot leave a group
    pub async fn leave_group(&self, group_id: i64) -> Result<()> {
        self.post_in_session("quit", json!({ "target": group_id }))
            .await?
            .into_status()
    }

    pub async fn group_config(&self, group_id: i64) -> Result<GroupConfig> {
        self.get_in_session("groupConfig", &[("target", group_id.to_string())])
            .await?
            .into_payload()
    }

    /// Change the group settings that are `Some` in `config`
    pub async fn set_group_config(&self, group_id: i64, config: &GroupConfig) -> Result<()> {
        let body = json!({ "target": group_id, "config": config });
        self.post_in_session("groupConfig", body).await?.into_status()
    }

    pub async fn member_info(&self, member_id: i64, group_id: i64) -> Result<MemberProfile> {
        let query = [
            ("target", group_id.to_string()),
            ("memberId", member_id.to_string()),
        ];
        self.get_in_session("memberInfo", &query).await?.into_payload()
    }

    pub async fn set_member_info(
        &self,
        member_id: i64,
        group_id: i64,
        profile: &MemberProfile,
    ) -> Result<()> {
        let body = json!({ "target": group_id, "memberId": member_id, "info": profile });
        self.post_in_session("memberInfo", body).await?.into_status()
    }

    /// Accounts allowed to manage `account_id`
    pub async fn managers(&self, account_id: i64) -> Result<Vec<i64>> {
        let active = self.active()?;
        active.guard(active.rpc.managers(account_id)).await
    }
}
