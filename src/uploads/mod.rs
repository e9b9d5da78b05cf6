//! Employee photo uploads to an external media host.

use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;

use crate::config::UploadConfig;

pub mod cloudinary;
pub mod s3;

pub use cloudinary::CloudinaryUploader;
pub use s3::{S3Store, S3Uploader};

#[async_trait]
pub trait PhotoUploader: Send + Sync {
    /// Uploads the image described by `source` and returns its durable URL.
    async fn upload(&self, source: &str) -> anyhow::Result<String>;
}

/// Used when no media host is configured.
pub struct DisabledUploader;

#[async_trait]
impl PhotoUploader for DisabledUploader {
    async fn upload(&self, _source: &str) -> anyhow::Result<String> {
        bail!("photo uploads are not configured")
    }
}

pub async fn from_config(cfg: &UploadConfig) -> anyhow::Result<Arc<dyn PhotoUploader>> {
    let uploader: Arc<dyn PhotoUploader> = match cfg {
        UploadConfig::Cloudinary(c) => Arc::new(CloudinaryUploader::new(c.clone())),
        UploadConfig::S3(c) => {
            let store = S3Store::new(&c.endpoint, &c.bucket, &c.access_key, &c.secret_key, &c.region)
                .await
                .context("init s3 client")?;
            Arc::new(S3Uploader::new(Arc::new(store), &c.public_url))
        }
        UploadConfig::Disabled => Arc::new(DisabledUploader),
    };
    Ok(uploader)
}

/// What a client may send as `employee_photo`.
#[derive(Debug, PartialEq)]
pub enum ImageSource<'a> {
    /// `http(s)://` URL the host fetches itself.
    Remote(&'a str),
    /// Bytes from a `data:` URI or a bare base64 string.
    Inline { content_type: String, data: Bytes },
}

impl ImageSource<'_> {
    pub fn parse(raw: &str) -> anyhow::Result<ImageSource<'_>> {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(ImageSource::Remote(raw));
        }

        if let Some(rest) = raw.strip_prefix("data:") {
            let (meta, payload) = rest.split_once(',').context("malformed data URI")?;
            let Some(mime) = meta.strip_suffix(";base64") else {
                bail!("only base64 data URIs are supported");
            };
            let data = decode_base64(payload)?;
            let content_type = if mime.is_empty() {
                sniff_mime(&data).to_string()
            } else {
                mime.to_string()
            };
            return Ok(ImageSource::Inline { content_type, data });
        }

        let data = decode_base64(raw)?;
        Ok(ImageSource::Inline {
            content_type: sniff_mime(&data).to_string(),
            data,
        })
    }

    /// Form accepted by hosts that take a URL or data URI string.
    pub fn to_uri(&self) -> String {
        match self {
            ImageSource::Remote(url) => (*url).to_string(),
            ImageSource::Inline { content_type, data } => {
                format!("data:{};base64,{}", content_type, STANDARD.encode(data))
            }
        }
    }
}

fn decode_base64(payload: &str) -> anyhow::Result<Bytes> {
    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let data = STANDARD
        .decode(cleaned)
        .context("image data is neither a URL nor valid base64")?;
    if data.is_empty() {
        bail!("image data is empty");
    }
    Ok(Bytes::from(data))
}

fn sniff_mime(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

pub(crate) fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[test]
    fn remote_urls_pass_through() {
        let src = ImageSource::parse(" https://cdn.example.com/a.jpg ").unwrap();
        assert_eq!(src, ImageSource::Remote("https://cdn.example.com/a.jpg"));
        assert_eq!(src.to_uri(), "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn data_uri_is_decoded() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(PNG_HEADER));
        match ImageSource::parse(&uri).unwrap() {
            ImageSource::Inline { content_type, data } => {
                assert_eq!(content_type, "image/png");
                assert_eq!(&data[..], PNG_HEADER);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bare_base64_is_sniffed() {
        let raw = STANDARD.encode(PNG_HEADER);
        let src = ImageSource::parse(&raw).unwrap();
        assert_eq!(src.to_uri(), format!("data:image/png;base64,{raw}"));
    }

    #[test]
    fn rejects_garbage_and_non_base64_data_uris() {
        assert!(ImageSource::parse("definitely not an image!").is_err());
        assert!(ImageSource::parse("data:text/plain,hello").is_err());
        assert!(ImageSource::parse("data:image/png;base64,").is_err());
    }

    #[tokio::test]
    async fn disabled_uploader_always_fails() {
        let err = DisabledUploader.upload("https://x/y.png").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
