//! Answering friend, join and invitation requests

use serde_json::json;

use super::types::{FriendRequestAction, GroupRequestAction, RequestRef};
use crate::error::Result;
use crate::session::MiraiSession;

impl MiraiSession {
    /// Answer a [`NewFriendRequestEvent`](crate::events::NewFriendRequestEvent)
    pub async fn respond_friend_request(
        &self,
        request: impl Into<RequestRef>,
        action: FriendRequestAction,
        message: &str,
    ) -> Result<()> {
        self.respond("newFriendRequestEvent", request.into(), action as i32, message)
            .await
    }

    /// Answer a `MemberJoinRequest` event
    pub async fn respond_group_join_request(
        &self,
        request: impl Into<RequestRef>,
        action: GroupRequestAction,
        message: &str,
    ) -> Result<()> {
        self.respond("memberJoinRequestEvent", request.into(), action as i32, message)
            .await
    }

    /// Answer a `BotInvitedJoinGroupRequest` event
    pub async fn respond_bot_invite(
        &self,
        request: impl Into<RequestRef>,
        action: GroupRequestAction,
        message: &str,
    ) -> Result<()> {
        self.respond(
            "botInvitedJoinGroupRequestEvent",
            request.into(),
            action as i32,
            message,
        )
        .await
    }

    async fn respond(
        &self,
        kind: &str,
        request: RequestRef,
        operate: i32,
        message: &str,
    ) -> Result<()> {
        let body = json!({
            "eventId": request.event_id,
            "fromId": request.from_id,
            "groupId": request.group_id,
            "operate": operate,
            "message": message,
        });
        self.post_in_session(&format!("resp/{}", kind), body)
            .await?
            .into_status()
    }
}
