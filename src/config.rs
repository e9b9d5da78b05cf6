use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        // argon2 crate defaults (OWASP minimum for Argon2id)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_url: String,
}

/// Where employee photos are sent.
#[derive(Debug, Clone, Deserialize)]
pub enum UploadConfig {
    Cloudinary(CloudinaryConfig),
    S3(S3Config),
    Disabled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub hash: HashConfig,
    pub upload: UploadConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "APP_PORT", 8080)?;

        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
        };

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            hash,
            upload: UploadConfig::from_lookup(&lookup)?,
        })
    }
}

impl UploadConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let provider = lookup("UPLOAD_PROVIDER").unwrap_or_else(|| {
            if lookup("CLOUDINARY_CLOUD_NAME").is_some() {
                "cloudinary".into()
            } else {
                "none".into()
            }
        });

        match provider.to_ascii_lowercase().as_str() {
            "cloudinary" => Ok(Self::Cloudinary(CloudinaryConfig {
                cloud_name: required(&lookup, "CLOUDINARY_CLOUD_NAME")?,
                api_key: required(&lookup, "CLOUDINARY_API_KEY")?,
                api_secret: required(&lookup, "CLOUDINARY_API_SECRET")?,
                folder: lookup("CLOUDINARY_FOLDER")
                    .unwrap_or_else(|| "comp3133_employees".into()),
                api_base: lookup("CLOUDINARY_API_BASE")
                    .unwrap_or_else(|| "https://api.cloudinary.com".into()),
            })),
            "s3" | "minio" => {
                let endpoint = required(&lookup, "S3_ENDPOINT")?;
                let bucket = required(&lookup, "S3_BUCKET")?;
                let public_url = lookup("S3_PUBLIC_URL")
                    .unwrap_or_else(|| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
                Ok(Self::S3(S3Config {
                    endpoint,
                    bucket,
                    access_key: required(&lookup, "S3_ACCESS_KEY")?,
                    secret_key: required(&lookup, "S3_SECRET_KEY")?,
                    region: lookup("S3_REGION").unwrap_or_else(|| "us-east-1".into()),
                    public_url,
                }))
            }
            "none" | "disabled" => Ok(Self::Disabled),
            other => bail!("unknown UPLOAD_PROVIDER {other:?} (expected cloudinary, s3 or none)"),
        }
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    lookup(key).with_context(|| format!("{key} is not set"))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => v
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value {v:?}")),
        None => Ok(default),
    }
}
