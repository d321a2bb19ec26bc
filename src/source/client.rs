//! Blocking reader for dump files and HTTP endpoints.

use crate::utils::config::{DEFAULT_FETCH_TIMEOUT, FULL_DUMP_QUERY};
use crate::utils::error::SourceError;
use log::{debug, info};
use reqwest::blocking::Client;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where a dump comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpSource {
    File(PathBuf),
    Url(String),
}

impl DumpSource {
    /// Interpret a command-line source: `http(s)://` means URL, anything else a path
    pub fn parse(source: &str) -> Result<Self, SourceError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SourceError::EmptySource);
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            Ok(DumpSource::Url(source.to_string()))
        } else {
            Ok(DumpSource::File(PathBuf::from(source)))
        }
    }
}

impl fmt::Display for DumpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpSource::File(path) => write!(f, "{}", path.display()),
            DumpSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Ask the pprof endpoint for the full dump unless the URL already has a query
pub fn full_dump_url(url: &str) -> String {
    if url.contains('?') {
        url.to_string()
    } else {
        format!("{}{}", url, FULL_DUMP_QUERY)
    }
}

/// Client that turns a [`DumpSource`] into dump text
pub struct DumpClient {
    client: Client,
}

impl DumpClient {
    /// Create a client with the default HTTP timeout
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::RequestFailed)?;

        Ok(Self { client })
    }

    /// Read the whole dump
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the parser only
    /// needs the ASCII structure of the dump.
    pub fn fetch(&self, source: &DumpSource) -> Result<String, SourceError> {
        match source {
            DumpSource::File(path) => {
                debug!("Reading dump from file: {}", path.display());
                let bytes = std::fs::read(path).map_err(|e| SourceError::ReadFailed {
                    path: path.display().to_string(),
                    source: e,
                })?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            DumpSource::Url(url) => self.fetch_url(url),
        }
    }

    fn fetch_url(&self, url: &str) -> Result<String, SourceError> {
        let url = full_dump_url(url);
        info!("Fetching goroutine dump: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(SourceError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(SourceError::BadStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().map_err(SourceError::RequestFailed)?;
        debug!("Received {} bytes", bytes.len());

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
