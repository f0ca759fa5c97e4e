//! Inbound frame sources
//!
//! The ingestion loops read [`Fragment`]s from a [`FrameSource`], which a
//! [`StreamConnector`] opens for a stream URL. The default connector speaks
//! WebSocket through `tokio-tungstenite`; [`channel_source`] gives an
//! in-memory source for embedding and tests.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::debug;
use url::Url;

use super::frame::Fragment;
use crate::error::{Error, Result};

/// A stream of inbound fragments
#[async_trait]
pub trait FrameSource: Send {
    /// Next fragment; `None` once the remote side has closed the stream
    async fn next_fragment(&mut self) -> Option<Result<Fragment>>;
}

/// Opens a [`FrameSource`] for a stream URL
#[async_trait]
pub trait StreamConnector: Send + Sync {
    async fn connect(&self, url: &Url) -> Result<Box<dyn FrameSource>>;
}

/// WebSocket connector backed by `tokio-tungstenite`
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketConnector;

#[async_trait]
impl StreamConnector for WebSocketConnector {
    async fn connect(&self, url: &Url) -> Result<Box<dyn FrameSource>> {
        let (stream, response) = connect_async(url.as_str()).await?;
        debug!("WebSocket connected: {} ({})", url.path(), response.status());
        Ok(Box::new(WebSocketSource { stream }))
    }
}

/// Fragments read from a WebSocket connection
pub struct WebSocketSource {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FrameSource for WebSocketSource {
    async fn next_fragment(&mut self) -> Option<Result<Fragment>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(e.into())),
            };

            match message {
                Message::Text(text) => return Some(Ok(Fragment::whole(text.as_str()))),
                Message::Binary(data) => return Some(Ok(Fragment::whole(data.to_vec()))),
                Message::Frame(frame) => {
                    return Some(Ok(Fragment {
                        data: frame.payload().to_vec(),
                        is_final: frame.header().is_final,
                    }))
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(reason) => {
                    debug!("WebSocket closed by gateway: {:?}", reason);
                    return None;
                }
            }
        }
    }
}

/// Sending half of an in-memory frame source
#[derive(Clone)]
pub struct FrameSender {
    tx: mpsc::UnboundedSender<Result<Fragment>>,
}

impl FrameSender {
    /// Push a fragment; fails once the source is gone
    pub fn send(&self, fragment: Fragment) -> Result<()> {
        self.tx
            .send(Ok(fragment))
            .map_err(|_| Error::WebSocket("frame source dropped".to_string()))
    }

    /// Push a whole text frame
    pub fn send_text(&self, text: impl Into<String>) -> Result<()> {
        self.send(Fragment::whole(text.into()))
    }

    /// Make the reader see a transport error
    pub fn fail(&self, error: Error) -> Result<()> {
        self.tx
            .send(Err(error))
            .map_err(|_| Error::WebSocket("frame source dropped".to_string()))
    }
}

/// In-memory frame source; dropping every [`FrameSender`] closes it
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Result<Fragment>>,
}

#[async_trait]
impl FrameSource for ChannelSource {
    async fn next_fragment(&mut self) -> Option<Result<Fragment>> {
        self.rx.recv().await
    }
}

/// Create a connected in-memory sender/source pair
pub fn channel_source() -> (FrameSender, ChannelSource) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FrameSender { tx }, ChannelSource { rx })
}
