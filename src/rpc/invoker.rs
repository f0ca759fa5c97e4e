//! RPC invoker - one HTTP request in, one envelope out

use reqwest::{multipart::Form, Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::envelope::Envelope;
use crate::config::SessionOptions;
use crate::error::{Error, Result};
use crate::session::ApiVersion;

/// Issues gateway requests over a shared HTTP client
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RpcInvoker {
    client: Client,
    options: SessionOptions,
}

impl RpcInvoker {
    /// Create an invoker for a gateway
    pub fn new(client: Client, options: SessionOptions) -> Self {
        RpcInvoker { client, options }
    }

    /// The gateway this invoker talks to
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Send a request and read the whole body into an envelope
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Envelope> {
        let url = self.options.endpoint(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("{} <- {} ({} bytes)", url, status, text.len());

        Ok(Envelope::parse(text))
    }

    /// GET with query parameters
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Envelope> {
        self.send(Method::GET, path, query, None).await
    }

    /// POST a JSON body
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Envelope> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, &[], Some(&body)).await
    }

    /// POST a multipart form
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Envelope> {
        let url = self.options.endpoint(path);
        debug!("POST {} (multipart)", url);

        let response = self.client.post(&url).multipart(form).send().await?;
        let text = response.text().await?;

        Ok(Envelope::parse(text))
    }

    /// `GET /about`: the gateway's version string, parsed
    pub async fn about(&self) -> Result<ApiVersion> {
        let data: Value = self.get("about", &[]).await?.into_field("data")?;
        let version = data
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::UnknownResponse(data.to_string()))?;
        ApiVersion::parse(version)
    }
}

/// Query the version of a gateway without opening a session
pub async fn fetch_version(client: &Client, options: &SessionOptions) -> Result<ApiVersion> {
    RpcInvoker::new(client.clone(), options.clone()).about().await
}
