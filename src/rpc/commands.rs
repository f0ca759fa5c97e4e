//! Operations authenticated by the auth key rather than a session
//!
//! These work against any reachable gateway, connected or not.

use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use super::invoker::RpcInvoker;
use crate::error::{Error, Result};

impl RpcInvoker {
    /// `POST /command/register`: add a console command
    pub async fn register_command(
        &self,
        name: &str,
        alias: &[String],
        description: Option<&str>,
        usage: Option<&str>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "command name must not be empty".to_string(),
            ));
        }

        let body = json!({
            "authKey": self.options().auth_key.expose_secret(),
            "name": name,
            "alias": alias,
            "description": description,
            "usage": usage,
        });

        debug!("Registering command {}", name);
        self.post_json("command/register", &body).await?.into_status()
    }

    /// `POST /command/send`: run a console command
    ///
    /// An unknown command fails with [`Error::TargetNotFound`].
    pub async fn execute_command(&self, name: &str, args: &[String]) -> Result<()> {
        let body = json!({
            "authKey": self.options().auth_key.expose_secret(),
            "name": name,
            "args": args,
        });

        self.post_json("command/send", &body).await?.into_status()
    }

    /// `GET /managers?qq=`: accounts allowed to manage the bot
    pub async fn managers(&self, account_id: i64) -> Result<Vec<i64>> {
        self.get("managers", &[("qq", account_id.to_string())])
            .await?
            .into_payload()
    }
}
