use catalog_logging::{catalog_debug, catalog_warn};
use reqwest::header::CONTENT_TYPE;

use crate::decode::decode_page;
use crate::{FailureKind, FetchError, FetchMetadata, FetchedPage};

/// Client options for the catalog fetch. Timeouts are left to the HTTP
/// client's defaults.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub redirect_limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self { redirect_limit: 5 }
    }
}

/// Retrieves one page as text. Implementations make a single attempt.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Any successful response is accepted, whatever its declared content type
/// or size; only transport failures and non-success statuses are errors.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        let redirect_limit = self.settings.redirect_limit;
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= redirect_limit {
                attempt.error("redirect limit exceeded")
            } else {
                attempt.follow()
            }
        });

        reqwest::Client::builder()
            .redirect(policy)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        let tld = final_url
            .host_str()
            .and_then(|host| host.rsplit('.').next())
            .filter(|label| !label.is_empty() && label.bytes().all(|b| b.is_ascii_lowercase()))
            .map(str::as_bytes);
        let decoded = decode_page(&bytes, content_type.as_deref(), tld);
        if decoded.had_errors {
            catalog_warn!(
                "Page {} contained bytes invalid for {}; replaced",
                final_url,
                decoded.encoding.name()
            );
        }
        catalog_debug!(
            "Fetched {} ({} bytes, {}, {})",
            final_url,
            bytes.len(),
            content_type.as_deref().unwrap_or("no content type"),
            decoded.encoding.name()
        );

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url: final_url.to_string(),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchedPage {
            html: decoded.text,
            metadata,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
