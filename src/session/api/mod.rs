//! Remote operations on a connected session
//!
//! Every operation here needs a connected session: before connect or after
//! release it fails with [`Error::NotConnected`], after dispose with
//! [`Error::Disposed`]. Releasing the session aborts calls still in flight
//! with [`Error::Cancelled`].

mod commands;
mod groups;
mod messages;
mod requests;
mod types;

pub use groups::DEFAULT_KICK_MESSAGE;
pub use types::{
    FriendRequestAction, GroupConfig, GroupRequestAction, MemberProfile, RequestRef,
    SessionConfig, UploadTarget, UploadedImage, UploadedVoice,
};

use serde_json::{json, Value};

use super::MiraiSession;
use crate::error::Result;
use crate::rpc::Envelope;

impl MiraiSession {
    /// POST `body` with the session key added
    async fn post_in_session(&self, path: &str, mut body: Value) -> Result<Envelope> {
        let active = self.active()?;
        body["sessionKey"] = json!(active.session_key()?);
        active.guard(active.rpc.post_json(path, &body)).await
    }

    /// GET with the session key prepended to `query`
    async fn get_in_session(&self, path: &str, query: &[(&str, String)]) -> Result<Envelope> {
        let active = self.active()?;
        let mut params = Vec::with_capacity(query.len() + 1);
        params.push(("sessionKey", active.session_key()?.to_string()));
        params.extend(query.iter().cloned());
        active.guard(active.rpc.get(path, &params)).await
    }
}
