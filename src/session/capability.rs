//! Gateway version and what it allows

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Version reported by the gateway's `/about`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApiVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        ApiVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string such as `1.8.0`, `v1.7.2` or `2.0.0-rc1`
    ///
    /// Any prefix before the first digit (`v`, `mirai-api-http `) is
    /// skipped; missing minor/patch parts count as 0.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = match text.find(|c: char| c.is_ascii_digit()) {
            Some(index) => &text[index..],
            None => "",
        };

        let mut parts = trimmed.split('.').map(leading_number);
        let major = parts
            .next()
            .flatten()
            .ok_or_else(|| Error::InvalidInput(format!("Unrecognised version: {}", text)))?;
        let minor = parts.next().flatten().unwrap_or(0);
        let patch = parts.next().flatten().unwrap_or(0);

        Ok(ApiVersion::new(major, minor, patch))
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ApiVersion::parse(s)
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// How images reach the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageUploadProtocol {
    /// Multipart `POST /uploadImage`
    Multipart,
    /// Gateways up to 1.7.0 only fetch images from a URL
    UrlRelay,
}

/// Operations that depend on the gateway version, resolved once at connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub voice_upload: bool,
    pub image_upload: ImageUploadProtocol,
}

impl Capabilities {
    const MULTIPART_IMAGES_AFTER: ApiVersion = ApiVersion::new(1, 7, 0);
    const VOICE_SINCE: ApiVersion = ApiVersion::new(1, 8, 0);

    pub fn for_version(version: ApiVersion) -> Self {
        Capabilities {
            voice_upload: version >= Self::VOICE_SINCE,
            image_upload: if version > Self::MULTIPART_IMAGES_AFTER {
                ImageUploadProtocol::Multipart
            } else {
                ImageUploadProtocol::UrlRelay
            },
        }
    }
}
