//! Source image fetching.
//!
//! Downloads the caller's photo before any generation call is made. A
//! response is accepted only with a 2xx status, an `image/*` content type and
//! a body of at most [`MAX_IMAGE_BYTES`].

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::gemini::InlineImage;

/// Largest accepted source image (10 MB)
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Content type assumed when the response carries none
const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// Storage domains source images may come from by default
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &["supabase.co", "supabase.in"];

/// Check a caller supplied image URL: http(s), parseable, allow-listed host.
///
/// A host matches a domain when it equals it or is a subdomain of it.
pub fn validate_image_url(raw: Option<&str>, allowed_domains: &[String]) -> Result<Url> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::invalid_input("Image URL is required"))?;

    let lowered = raw.to_ascii_lowercase();
    let has_scheme = ["http://", "https://"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme) && lowered.len() > scheme.len());
    if !has_scheme {
        return Err(Error::invalid_input("Invalid image URL format"));
    }

    let url = Url::parse(raw).map_err(|_| Error::invalid_input("Invalid image URL format"))?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::invalid_input("Invalid image URL format"))?
        .to_ascii_lowercase();

    let allowed = allowed_domains.iter().any(|domain| {
        let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
        !domain.is_empty() && (host == domain || host.ends_with(&format!(".{domain}")))
    });
    if !allowed {
        return Err(Error::invalid_input(
            "Image URL must be from an allowed storage domain",
        ));
    }

    Ok(url)
}

/// Default allow list as owned strings
pub fn default_allowed_domains() -> Vec<String> {
    DEFAULT_ALLOWED_DOMAINS.iter().map(|d| d.to_string()).collect()
}

/// A downloaded source image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn to_inline(&self) -> InlineImage {
        InlineImage::from_bytes(self.mime_type.clone(), &self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        self.to_inline().to_data_uri()
    }
}

/// Where source images come from. [`HttpImageSource`] is the production implementation.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<SourceImage>;
}

/// Fetches source images over HTTP(S)
#[derive(Clone)]
pub struct HttpImageSource {
    http: reqwest::Client,
    max_bytes: usize,
}

impl HttpImageSource {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            max_bytes: MAX_IMAGE_BYTES,
        })
    }

    /// Override the size cap
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn too_large(&self) -> Error {
        Error::upstream_fetch(format!(
            "Image too large (max {}MB)",
            self.max_bytes / (1024 * 1024)
        ))
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &Url) -> Result<SourceImage> {
        let mut response = self.http.get(url.clone()).send().await.map_err(|e| {
            debug!(url = %url, error = %e, "Source image request failed");
            Error::upstream_fetch("Failed to fetch image")
        })?;

        if !response.status().is_success() {
            debug!(url = %url, status = %response.status(), "Source image returned error status");
            return Err(Error::upstream_fetch("Failed to fetch image"));
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        if !mime_type.starts_with("image/") {
            return Err(Error::upstream_fetch("URL does not point to an image"));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(self.too_large());
            }
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|_| Error::upstream_fetch("Failed to fetch image"))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = bytes.len(), mime_type = %mime_type, "Source image fetched");
        Ok(SourceImage { mime_type, bytes })
    }
}
