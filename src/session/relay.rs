//! Image relay for gateways without multipart uploads
//!
//! Gateways up to 1.7.0 only take images by URL. The relay keeps uploaded
//! bytes in memory and serves them from `GET /fetch?guid=...` on a local
//! listener, so an `upload_image` call can hand back a URL instead of an
//! image id.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::Result;

struct StoredImage {
    mime: String,
    data: Bytes,
}

/// Images by guid, oldest first in `order`
#[derive(Default)]
struct ImageStore {
    images: HashMap<String, StoredImage>,
    order: VecDeque<String>,
}

#[derive(Clone)]
struct RelayState {
    store: Arc<Mutex<ImageStore>>,
}

/// A running relay; stops serving when shut down or dropped
pub struct ImageRelay {
    state: RelayState,
    capacity: usize,
    base_url: String,
    local_addr: SocketAddr,
    shutdown: CancellationToken,
}

impl ImageRelay {
    /// Bind the listener and start serving
    pub async fn bind(config: &RelayConfig) -> Result<Self> {
        let listener =
            tokio::net::TcpListener::bind((config.bind_host.as_str(), config.port)).await?;
        let local_addr = listener.local_addr()?;

        let host = config
            .public_host
            .clone()
            .unwrap_or_else(|| local_addr.ip().to_string());
        let base_url = format!("http://{}:{}", host, local_addr.port());

        let state = RelayState {
            store: Arc::new(Mutex::new(ImageStore::default())),
        };
        let app = Router::new()
            .route("/fetch", get(fetch_image))
            .with_state(state.clone());

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await;
            if let Err(e) = served {
                warn!("Image relay stopped: {}", e);
            }
        });
        info!("Image relay listening on {} (serving as {})", local_addr, base_url);

        Ok(ImageRelay {
            state,
            capacity: config.capacity.max(1),
            base_url,
            local_addr,
            shutdown,
        })
    }

    /// Keep an image and return the URL the gateway fetches it from
    pub fn register(&self, data: Vec<u8>, mime: &str) -> String {
        let guid = Uuid::new_v4().simple().to_string();

        let mut store = self.state.store.lock();
        store.images.insert(
            guid.clone(),
            StoredImage {
                mime: mime.to_string(),
                data: Bytes::from(data),
            },
        );
        store.order.push_back(guid.clone());
        while store.order.len() > self.capacity {
            if let Some(oldest) = store.order.pop_front() {
                store.images.remove(&oldest);
            }
        }

        format!("{}/fetch?guid={}", self.base_url, guid)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of images currently served
    pub fn len(&self) -> usize {
        self.state.store.lock().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop accepting connections
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for ImageRelay {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[derive(Deserialize)]
struct FetchParams {
    guid: String,
}

async fn fetch_image(
    State(state): State<RelayState>,
    Query(params): Query<FetchParams>,
) -> Response {
    let image = state
        .store
        .lock()
        .images
        .get(&params.guid)
        .map(|image| (image.mime.clone(), image.data.clone()));

    match image {
        Some((mime, data)) => {
            debug!("Relay served {} ({} bytes)", params.guid, data.len());
            ([(header::CONTENT_TYPE, mime)], data).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn relay(capacity: usize) -> ImageRelay {
        let config = RelayConfig {
            capacity,
            ..Default::default()
        };
        ImageRelay::bind(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_registered_image_is_served() {
        let relay = relay(8).await;
        let url = relay.register(b"GIF89a-bytes".to_vec(), "image/gif");
        assert!(url.starts_with(&format!("http://127.0.0.1:{}/fetch?guid=", relay.local_addr().port())));

        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[reqwest::header::CONTENT_TYPE], "image/gif");
        assert_eq!(response.bytes().await.unwrap().as_ref(), b"GIF89a-bytes");
    }

    #[tokio::test]
    async fn test_unknown_guid_is_not_found() {
        let relay = relay(8).await;
        let url = format!("http://{}/fetch?guid=missing", relay.local_addr());
        assert_eq!(reqwest::get(&url).await.unwrap().status(), 404);
    }

    #[tokio::test]
    async fn test_oldest_image_is_evicted() {
        let relay = relay(2).await;
        let first = relay.register(vec![1], "image/png");
        relay.register(vec![2], "image/png");
        let third = relay.register(vec![3], "image/png");

        assert_eq!(relay.len(), 2);
        assert_eq!(reqwest::get(&first).await.unwrap().status(), 404);
        assert_eq!(reqwest::get(&third).await.unwrap().status(), 200);
    }

    #[tokio::test]
    async fn test_public_host_is_used_in_urls() {
        let config = RelayConfig {
            public_host: Some("bot.lan".to_string()),
            ..Default::default()
        };
        let relay = ImageRelay::bind(&config).await.unwrap();
        let url = relay.register(vec![0], "image/png");
        assert!(url.starts_with(&format!("http://bot.lan:{}/", relay.local_addr().port())));
    }
}
