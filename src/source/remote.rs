//! Downloads a raw table over HTTP(S) and keeps a copy in a cache directory.

use crate::source::error::SourceError;
use crate::source::local::read_csv;
use crate::source::RecordSource;
use crate::utils::get_cache_dir;
use async_compression::tokio::bufread::GzipDecoder;
use bon::bon;
use futures_util::TryStreamExt;
use log::{info, warn};
use polars::prelude::DataFrame;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// A CSV file published at a URL, optionally gzip-compressed (`.gz` suffix).
///
/// The first [`load`](RecordSource::load) downloads the file into the cache directory;
/// later loads read the cached copy. There is no retry: a failed download is an error.
///
/// # Example
///
/// ```no_run
/// use fireweather::{HttpCsvSource, RecordSource};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let alerts = HttpCsvSource::url("https://example.org/viirs_fire_alerts__count.csv.gz")
///     .build()?;
/// let frame = alerts.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpCsvSource {
    url: String,
    cache_dir: PathBuf,
    client: Client,
}

#[bon]
impl HttpCsvSource {
    /// Creates a source for `url`.
    ///
    /// * `.cache_dir(PathBuf)`: Optional. Where downloads are kept. Defaults to
    ///   `fireweather_cache` inside the system cache directory.
    ///
    /// # Errors
    ///
    /// [`SourceError::CacheDirResolution`] when no cache directory is given and the system one
    /// can't be determined.
    #[builder(start_fn = url, finish_fn = build)]
    pub fn new(
        #[builder(start_fn, into)] url: String,
        cache_dir: Option<PathBuf>,
    ) -> Result<Self, SourceError> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => get_cache_dir().map_err(SourceError::CacheDirResolution)?,
        };
        Ok(Self {
            url,
            cache_dir,
            client: Client::new(),
        })
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(cache_file_name(&self.url))
    }

    async fn download(&self) -> Result<Vec<u8>, SourceError> {
        info!("Downloading data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::NetworkRequest(self.url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", self.url, e);
                return Err(if let Some(status) = e.status() {
                    SourceError::HttpStatus {
                        url: self.url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    SourceError::NetworkRequest(self.url.clone(), e)
                });
            }
        };

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let bytes = read_body(StreamReader::new(stream), is_gzip(&self.url)).await?;
        info!("Downloaded {} bytes from {}", bytes.len(), self.url);
        Ok(bytes)
    }

    /// Writes next to the final path first so readers never see a half-written file.
    async fn store(&self, bytes: Vec<u8>, cache_path: &Path) -> Result<(), SourceError> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| SourceError::CacheDirCreation(self.cache_dir.clone(), e))?;

        let dir = self.cache_dir.clone();
        let target = cache_path.to_path_buf();
        task::spawn_blocking(move || {
            let write_err = |e: std::io::Error| SourceError::CacheWrite(target.clone(), e);
            let mut temp_file = NamedTempFile::new_in(&dir).map_err(write_err)?;
            temp_file.write_all(&bytes).map_err(write_err)?;
            temp_file.flush().map_err(write_err)?;
            temp_file
                .persist(&target)
                .map_err(|e| SourceError::CacheWrite(target.clone(), e.error))?;
            Ok::<(), SourceError>(())
        })
        .await??;
        Ok(())
    }
}

impl RecordSource for HttpCsvSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> Result<DataFrame, SourceError> {
        let cache_path = self.cache_path();

        if fs::metadata(&cache_path).await.is_ok() {
            info!("Cache hit for {} at {}", self.url, cache_path.display());
        } else {
            warn!("Cache miss for {}. Downloading.", self.url);
            let bytes = self.download().await?;
            self.store(bytes, &cache_path).await?;
            info!("Cached {} to {}", self.url, cache_path.display());
        }

        let path = cache_path.clone();
        task::spawn_blocking(move || read_csv(&path)).await?
    }
}

/// Reads a response body to the end, decompressing it first when `gzip` is set.
async fn read_body<R>(mut reader: R, gzip: bool) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    if gzip {
        let mut decoder = GzipDecoder::new(BufReader::new(reader));
        decoder.read_to_end(&mut bytes).await?;
    } else {
        reader.read_to_end(&mut bytes).await?;
    }
    Ok(bytes)
}

fn is_gzip(url: &str) -> bool {
    url_path(url).ends_with(".gz")
}

/// The URL without query string or fragment.
fn url_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// 64-bit FNV-1a. Stable across builds and platforms.
fn url_hash(url: &str) -> u64 {
    url.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Hash of the full URL followed by its last path segment without a `.gz` suffix.
///
/// The hash keeps URLs that share a file name (other host, query or compression) apart.
fn cache_file_name(url: &str) -> String {
    let segment = url_path(url)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("download.csv");
    let base = segment.strip_suffix(".gz").unwrap_or(segment);
    format!("{:016x}-{}", url_hash(url), base)
}
