use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{ext_from_mime, ImageSource, PhotoUploader};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
}

/// S3 or MinIO bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        // MinIO serves buckets as `<endpoint>/<bucket>`, not as subdomains.
        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(())
    }
}

/// Stores photos in a bucket that is publicly readable under `public_url`.
pub struct S3Uploader {
    store: Arc<dyn ObjectStore>,
    http: reqwest::Client,
    public_url: String,
}

impl S3Uploader {
    pub fn new(store: Arc<dyn ObjectStore>, public_url: &str) -> Self {
        Self {
            store,
            http: reqwest::Client::new(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, url: &str) -> anyhow::Result<(String, Bytes)> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("download {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("download {url} returned {status}");
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = resp.bytes().await.with_context(|| format!("read {url}"))?;
        Ok((content_type, body))
    }
}

#[async_trait]
impl PhotoUploader for S3Uploader {
    #[instrument(skip(self, source))]
    async fn upload(&self, source: &str) -> anyhow::Result<String> {
        let (content_type, data) = match ImageSource::parse(source)? {
            ImageSource::Remote(url) => self.fetch(url).await?,
            ImageSource::Inline { content_type, data } => (content_type, data),
        };

        let ext = ext_from_mime(&content_type).unwrap_or("bin");
        let key = format!("employees/{}.{}", Uuid::new_v4(), ext);
        self.store
            .put_object(&key, data, &content_type)
            .await
            .with_context(|| format!("put_object {key}"))?;

        let url = format!("{}/{}", self.public_url, key);
        debug!(%url, "photo stored");
        Ok(url)
    }
}
