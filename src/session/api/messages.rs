//! Sending, recalling and uploading

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::types::{UploadTarget, UploadedImage, UploadedVoice};
use crate::error::{Error, Result};
use crate::message::MessageChain;
use crate::session::{ImageUploadProtocol, MiraiSession};

impl MiraiSession {
    /// Send to a friend; returns the message id
    pub async fn send_friend_message(
        &self,
        friend_id: i64,
        chain: &MessageChain,
        quote: Option<i64>,
    ) -> Result<i64> {
        self.send_message("sendFriendMessage", Some(friend_id), None, chain, quote)
            .await
    }

    /// Send a private message to a group member
    pub async fn send_temp_message(
        &self,
        member_id: i64,
        group_id: i64,
        chain: &MessageChain,
        quote: Option<i64>,
    ) -> Result<i64> {
        self.send_message("sendTempMessage", Some(member_id), Some(group_id), chain, quote)
            .await
    }

    pub async fn send_group_message(
        &self,
        group_id: i64,
        chain: &MessageChain,
        quote: Option<i64>,
    ) -> Result<i64> {
        self.send_message("sendGroupMessage", None, Some(group_id), chain, quote)
            .await
    }

    async fn send_message(
        &self,
        path: &str,
        qq: Option<i64>,
        group: Option<i64>,
        chain: &MessageChain,
        quote: Option<i64>,
    ) -> Result<i64> {
        self.active()?;
        chain.validate_outgoing()?;

        let mut body = json!({ "messageChain": chain });
        insert_some(&mut body, "qq", qq);
        insert_some(&mut body, "group", group);
        insert_some(&mut body, "quote", quote);

        self.post_in_session(path, body).await?.into_field("messageId")
    }

    /// Recall a message the bot can recall
    pub async fn recall(&self, message_id: i64) -> Result<()> {
        self.post_in_session("recall", json!({ "target": message_id }))
            .await?
            .into_status()
    }

    /// Have the gateway fetch `urls` and send them to a friend as images
    pub async fn send_image_to_friend(&self, friend_id: i64, urls: &[String]) -> Result<Vec<String>> {
        self.send_image(Some(friend_id), None, urls).await
    }

    pub async fn send_image_to_temp(
        &self,
        member_id: i64,
        group_id: i64,
        urls: &[String],
    ) -> Result<Vec<String>> {
        self.send_image(Some(member_id), Some(group_id), urls).await
    }

    pub async fn send_image_to_group(&self, group_id: i64, urls: &[String]) -> Result<Vec<String>> {
        self.send_image(None, Some(group_id), urls).await
    }

    async fn send_image(
        &self,
        qq: Option<i64>,
        group: Option<i64>,
        urls: &[String],
    ) -> Result<Vec<String>> {
        self.active()?;
        if urls.is_empty() {
            return Err(Error::InvalidInput(
                "at least one image url is required".to_string(),
            ));
        }

        let mut body = json!({ "urls": urls });
        insert_some(&mut body, "qq", qq);
        insert_some(&mut body, "group", group);

        self.post_in_session("sendImageMessage", body)
            .await?
            .into_payload()
    }

    /// Upload an image for later use in a message
    ///
    /// Only JPEG, PNG and GIF data is accepted. Gateways newer than 1.7.0
    /// store the image and return its id; older ones cannot take uploads, so
    /// the image is served from the local [`ImageRelay`](crate::session::ImageRelay)
    /// and only `url` is set on the result.
    pub async fn upload_image(&self, target: UploadTarget, image: Vec<u8>) -> Result<UploadedImage> {
        let active = self.active()?;
        let format = image_format(&image)?;

        match active.capabilities().map(|c| c.image_upload) {
            Some(ImageUploadProtocol::Multipart) => {}
            Some(ImageUploadProtocol::UrlRelay) => {
                let relay = self.image_relay().await?;
                let url = relay.register(image, &format!("image/{}", format));
                debug!("Relaying {} image for {} as {}", format, target.as_str(), url);
                return Ok(UploadedImage {
                    image_id: None,
                    url: Some(url),
                    path: None,
                });
            }
            None => {
                return Err(Error::NotSupported(format!(
                    "image upload needs a known gateway version (connected to {})",
                    version_label(active.version())
                )))
            }
        }

        let part = Part::bytes(image)
            .file_name(format!("{}.{}", Uuid::new_v4().simple(), format))
            .mime_str(&format!("image/{}", format))?;
        let form = Form::new()
            .text("sessionKey", active.session_key()?.to_string())
            .text("type", target.as_str())
            .part("img", part);

        let envelope = active.guard(active.rpc.post_multipart("uploadImage", form)).await?;
        if !envelope.is_json() {
            return Err(Error::NotSupported(
                "the gateway cannot accept image uploads".to_string(),
            ));
        }
        envelope.into_payload()
    }

    /// Upload an AMR voice clip for later use in a message; needs 1.8.0+
    pub async fn upload_voice(&self, target: UploadTarget, voice: Vec<u8>) -> Result<UploadedVoice> {
        let active = self.active()?;
        if !active.capabilities().is_some_and(|c| c.voice_upload) {
            return Err(Error::NotSupported(format!(
                "voice upload needs gateway 1.8.0 or later (connected to {})",
                version_label(active.version())
            )));
        }

        let part = Part::bytes(voice).file_name(format!("{}.amr", Uuid::new_v4().simple()));
        let form = Form::new()
            .text("sessionKey", active.session_key()?.to_string())
            .text("type", target.as_str())
            .part("voice", part);

        active
            .guard(active.rpc.post_multipart("uploadVoice", form))
            .await?
            .into_payload()
    }
}

fn insert_some(body: &mut Value, key: &str, value: Option<i64>) {
    if let Some(value) = value {
        body[key] = json!(value);
    }
}

fn version_label(version: Option<crate::session::ApiVersion>) -> String {
    version.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string())
}

/// Image format from magic bytes
fn image_format(data: &[u8]) -> Result<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Ok("jpeg")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Ok("gif")
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Ok("png")
    } else {
        Err(Error::InvalidInput(
            "image must be JPEG, PNG or GIF data".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format() {
        assert_eq!(image_format(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap(), "jpeg");
        assert_eq!(image_format(b"GIF89a....").unwrap(), "gif");
        assert_eq!(image_format(b"\x89PNG\r\n\x1a\n....").unwrap(), "png");
    }

    #[test]
    fn test_unknown_image_formats_are_rejected() {
        let samples: [&[u8]; 4] = [b"BM6\x00\x00", b"RIFF\x00\x00\x00\x00WEBP", b"", b"\x89PN"];
        for data in samples {
            assert!(matches!(image_format(data), Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_insert_some_skips_none() {
        let mut body = json!({});
        insert_some(&mut body, "qq", Some(1));
        insert_some(&mut body, "group", None);
        assert_eq!(body, json!({"qq": 1}));
    }
}
