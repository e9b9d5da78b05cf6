//! Cloudinary signed uploads via the REST API (no SDK dependency).

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::{ImageSource, PhotoUploader};
use crate::config::CloudinaryConfig;

#[derive(Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    cfg: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryUploader {
    pub fn new(cfg: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cfg,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.cfg.api_base.trim_end_matches('/'),
            self.cfg.cloud_name
        )
    }
}

/// Signature over the signed params (sorted by name) followed by the secret.
fn sign(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let to_sign = format!("folder={folder}&timestamp={timestamp}{api_secret}");
    hex::encode(Sha1::digest(to_sign.as_bytes()))
}

#[async_trait]
impl PhotoUploader for CloudinaryUploader {
    #[instrument(skip(self, source), fields(folder = %self.cfg.folder))]
    async fn upload(&self, source: &str) -> anyhow::Result<String> {
        let file = ImageSource::parse(source)?.to_uri();
        let timestamp = OffsetDateTime::now_utc().unix_timestamp();
        let signature = sign(&self.cfg.folder, timestamp, &self.cfg.api_secret);
        let timestamp = timestamp.to_string();

        let resp = self
            .client
            .post(self.endpoint())
            .form(&[
                ("file", file.as_str()),
                ("folder", self.cfg.folder.as_str()),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.cfg.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await
            .context("cloudinary request")?;

        let status = resp.status();
        let body: UploadResponse = resp
            .json()
            .await
            .with_context(|| format!("cloudinary response ({status})"))?;

        if let Some(err) = body.error {
            bail!(err.message);
        }
        match body.secure_url {
            Some(url) if status.is_success() => {
                debug!(%url, "cloudinary upload ok");
                Ok(url)
            }
            _ => bail!("cloudinary returned {status} without a secure_url"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn uploader(api_base: &str) -> CloudinaryUploader {
        CloudinaryUploader::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "shh".into(),
            folder: "comp3133_employees".into(),
            api_base: api_base.into(),
        })
    }

    #[test]
    fn signature_is_sha1_hex_of_sorted_params_and_secret() {
        let expected = hex::encode(Sha1::digest(
            b"folder=comp3133_employees&timestamp=1700000000shh",
        ));
        let got = sign("comp3133_employees", 1_700_000_000, "shh");
        assert_eq!(got, expected);
        assert_eq!(got.len(), 40);
    }

    #[tokio::test]
    async fn returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1_1/demo/image/upload"))
            .and(body_string_contains("folder=comp3133_employees"))
            .and(body_string_contains("api_key=1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/ada.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = uploader(&server.uri())
            .upload("https://example.com/ada.png")
            .await
            .unwrap();
        assert_eq!(url, "https://res.cloudinary.com/demo/image/upload/v1/ada.png");
    }

    #[tokio::test]
    async fn surfaces_provider_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "Invalid image file" }
            })))
            .mount(&server)
            .await;

        let err = uploader(&server.uri())
            .upload("https://example.com/not-an-image.txt")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid image file");
    }

    #[tokio::test]
    async fn invalid_source_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(uploader(&server.uri()).upload("???").await.is_err());
    }
}
