//! Session settings, gateway info and console commands

use super::types::SessionConfig;
use crate::error::Result;
use crate::session::{ApiVersion, MiraiSession};

impl MiraiSession {
    /// `GET /config`
    pub async fn session_config(&self) -> Result<SessionConfig> {
        self.get_in_session("config", &[]).await?.into_payload()
    }

    /// `POST /config`; `None` fields are left unchanged
    pub async fn set_session_config(&self, config: &SessionConfig) -> Result<()> {
        let body = serde_json::to_value(config)?;
        self.post_in_session("config", body).await?.into_status()
    }

    /// Ask the gateway for its version now
    ///
    /// [`api_version`](Self::api_version) returns the one seen at connect.
    pub async fn server_version(&self) -> Result<ApiVersion> {
        let active = self.active()?;
        active.guard(active.rpc.about()).await
    }

    /// Register a console command on the gateway
    pub async fn register_command(
        &self,
        name: &str,
        alias: &[String],
        description: Option<&str>,
        usage: Option<&str>,
    ) -> Result<()> {
        let active = self.active()?;
        active
            .guard(active.rpc.register_command(name, alias, description, usage))
            .await
    }

    /// Run a console command; an unknown name fails with
    /// [`Error::TargetNotFound`](crate::Error::TargetNotFound)
    pub async fn execute_command(&self, name: &str, args: &[String]) -> Result<()> {
        let active = self.active()?;
        active.guard(active.rpc.execute_command(name, args)).await
    }
}
