use crate::error::{CheckerError, Result};
use crate::repository::IndexFetcher;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

/// Blocking HTTP client for repository indexes. One GET per call, no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("helm-update-checker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CheckerError::HttpClient)?;

        Ok(Self { client })
    }
}

/// Anything but `200 OK` is a failed fetch, including other 2xx codes.
fn ensure_ok(url: &Url, status: StatusCode) -> Result<()> {
    if status == StatusCode::OK {
        return Ok(());
    }

    log::debug!("HTTP {}: {}", status, url);
    Err(CheckerError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
    })
}

impl IndexFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let http_error = |source: reqwest::Error| CheckerError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.as_str()).send().map_err(http_error)?;

        ensure_ok(url, response.status())?;

        let body = response.bytes().map_err(http_error)?;
        Ok(body.to_vec())
    }
}
