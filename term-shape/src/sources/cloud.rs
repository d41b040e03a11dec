//! Object storage sources for S3, GCS, and Azure Blob Storage.
//!
//! Remote objects are downloaded into a local temporary file before they are
//! scanned. The temporary file belongs to a [`DownloadedObject`] and is
//! deleted when that value is dropped, whatever the outcome of the scan.

use super::{CsvOptions, CsvRows, RowSource};
use crate::core::ValidationResult;
use crate::prelude::*;
use futures::StreamExt;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::ffi::OsString;
use std::fmt::Debug;
use std::io::{BufReader, Write};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};
use url::Url;

use crate::security::redact_locator;

#[cfg(feature = "s3")]
use crate::security::SecureString;

#[cfg(feature = "s3")]
use object_store::{aws::AmazonS3Builder, RetryConfig};

/// S3 authentication configuration.
#[cfg(feature = "s3")]
#[derive(Debug, Clone)]
pub enum S3Auth {
    /// Use IAM instance credentials
    InstanceCredentials,
    /// Use access key and secret
    AccessKey {
        access_key_id: String,
        secret_access_key: SecureString,
        session_token: Option<SecureString>,
    },
}

/// Configuration for an S3 object.
#[cfg(feature = "s3")]
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
    /// AWS region (optional, will be auto-detected if not specified)
    pub region: Option<String>,
    /// Authentication method
    pub auth: S3Auth,
    /// Custom endpoint (for S3-compatible services)
    pub endpoint: Option<String>,
}

/// A delimited text object in cloud storage.
///
/// # Examples
///
/// ```rust,ignore
/// use term_shape::sources::ObjectStoreSource;
///
/// # async fn example() -> term_shape::prelude::Result<()> {
/// // Credentials come from the usual AWS_* / GOOGLE_* / AZURE_* variables
/// let source = ObjectStoreSource::from_url("s3://landing/2024/orders.csv")?;
/// let result = source.validate(12).await?;
/// println!("{result}");
/// # Ok(())
/// # }
/// ```
pub struct ObjectStoreSource {
    identifier: String,
    store: Arc<dyn ObjectStore>,
    path: ObjectPath,
    options: CsvOptions,
}

impl Debug for ObjectStoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreSource")
            .field("identifier", &self.identifier)
            .field("store", &self.store.to_string())
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl ObjectStoreSource {
    /// Creates a source from an object URL (`s3://`, `gs://`, `az://`, ...).
    ///
    /// The backend for the URL scheme must be enabled through the matching
    /// crate feature. Credentials, region and endpoint are read from
    /// `AWS_*`, `GOOGLE_*` and `AZURE_*` environment variables. The
    /// identifier is the URL with any embedded credentials removed.
    pub fn from_url(url: &str) -> Result<Self> {
        Self::from_url_with_options(url, env_options(std::env::vars_os()))
    }

    /// Creates a source from an object URL and explicit store options.
    ///
    /// Keys are the lowercase configuration keys of the store builders, such
    /// as `aws_region` or `google_service_account`. Unknown keys are ignored.
    pub fn from_url_with_options<I, K, V>(url: &str, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let identifier = redact_locator(url).into_owned();
        let parsed = Url::parse(url).map_err(|e| {
            ShapeError::data_source_with_source(
                "object_store",
                format!("Invalid object URL '{identifier}'"),
                Box::new(e),
            )
        })?;
        let (store, path) = object_store::parse_url_opts(&parsed, options)?;

        debug!(source.id = %identifier, store = %store, "Resolved object URL");

        Ok(Self {
            identifier,
            store: Arc::from(store),
            path,
            options: CsvOptions::default(),
        })
    }

    /// Creates a source for `path` in an already configured store.
    pub fn with_store(
        identifier: impl Into<String>,
        store: Arc<dyn ObjectStore>,
        path: impl Into<ObjectPath>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            store,
            path: path.into(),
            options: CsvOptions::default(),
        }
    }

    /// Creates an S3 source from explicit configuration.
    #[cfg(feature = "s3")]
    pub fn from_s3(config: S3Config) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_retry(RetryConfig {
                max_retries: 3,
                retry_timeout: std::time::Duration::from_secs(30),
                ..Default::default()
            });

        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        match &config.auth {
            S3Auth::InstanceCredentials => {
                // IAM instance credentials will be auto-detected
            }
            S3Auth::AccessKey {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                builder = builder
                    .with_access_key_id(access_key_id)
                    .with_secret_access_key(secret_access_key.expose());

                if let Some(token) = session_token {
                    builder = builder.with_token(token.expose());
                }
            }
        }

        let store = builder.build().map_err(|e| {
            ShapeError::data_source_with_source(
                "s3",
                "Failed to create S3 client",
                Box::new(e),
            )
        })?;

        Ok(Self {
            identifier: format!("s3://{}/{}", config.bucket, config.key),
            store: Arc::new(store),
            path: ObjectPath::from(config.key.as_str()),
            options: CsvOptions::default(),
        })
    }

    /// Sets custom tokenizer options.
    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the label reported in results.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Downloads the object into a local temporary file.
    #[instrument(skip(self), fields(source.type = "object_store", source.id = %self.identifier))]
    pub async fn download(&self) -> Result<DownloadedObject> {
        let mut file = tempfile::Builder::new()
            .prefix("term-shape-")
            .suffix(".download")
            .tempfile()?;

        let mut stream = self.store.get(&self.path).await?.into_stream();
        let mut bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)?;
            bytes += chunk.len() as u64;
        }
        file.flush()?;

        info!(
            source.id = %self.identifier,
            bytes,
            temp_path = %file.path().display(),
            "Downloaded object for validation"
        );

        Ok(DownloadedObject {
            identifier: self.identifier.clone(),
            file,
            options: self.options.clone(),
        })
    }

    /// Downloads the object, scans it, and removes the local copy.
    pub async fn validate(&self, expected_field_count: i64) -> Result<ValidationResult> {
        let downloaded = self.download().await?;
        super::validate_source(&downloaded, expected_field_count)
    }
}

/// Prefixes of the environment variables read by the store builders.
const ENV_PREFIXES: [&str; 3] = ["AWS_", "GOOGLE_", "AZURE_"];

/// Turns storage environment variables into lowercase builder options.
fn env_options<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter(|(key, _)| ENV_PREFIXES.iter().any(|prefix| key.starts_with(prefix)))
        .map(|(key, value)| (key.to_ascii_lowercase(), value))
        .collect()
}

/// A local copy of a remote object.
///
/// The copy is removed from disk when this value is dropped.
#[derive(Debug)]
pub struct DownloadedObject {
    identifier: String,
    file: NamedTempFile,
    options: CsvOptions,
}

impl DownloadedObject {
    /// Returns the path of the local copy.
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

impl Drop for DownloadedObject {
    fn drop(&mut self) {
        debug!(
            source.id = %self.identifier,
            temp_path = %self.file.path().display(),
            "Removing downloaded copy"
        );
    }
}

impl RowSource for DownloadedObject {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn description(&self) -> String {
        format!("Object: {}", self.identifier)
    }

    fn open(&self) -> Result<CsvRows> {
        let file = self.file.reopen()?;
        Ok(CsvRows::from_reader(BufReader::new(file), &self.options))
    }
}
