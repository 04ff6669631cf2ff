//! Location photo search against the Flickr REST endpoint.

use async_trait::async_trait;
use tracing::{debug, info};
use waypin_model::{BoundingBox, Coordinate, PhotoDescriptor};

use crate::error::{Error, Result};

/// Search port: given a coordinate, produce photo descriptors.
///
/// Production uses [`FlickrApiProvider`]; tests inject canned providers.
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    async fn search_photos(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<PhotoDescriptor>>;
}

const DEFAULT_BASE_URL: &str = "https://api.flickr.com/services/rest/";
const SEARCH_METHOD: &str = "flickr.photos.search";
const SAFE_SEARCH: &str = "1";
const EXTRAS: &str = "url_m";
const DATA_FORMAT: &str = "json";
const NO_JSON_CALLBACK: &str = "1";

/// Client for the photo-search endpoint.
///
/// Leaf component: one network round trip per search, no retries, no
/// persistence, no UI interaction. Construct one explicitly and share it;
/// there is no ambient singleton.
pub struct FlickrApiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for FlickrApiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlickrApiProvider")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FlickrApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Search for photos around a coordinate.
    ///
    /// Builds the clamped bounding-box query, performs exactly one GET, and
    /// parses the body. Transport failures surface verbatim as
    /// [`Error::Network`]; body-shape failures as [`Error::Parse`].
    pub async fn search_photos(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<PhotoDescriptor>> {
        let bbox = BoundingBox::around(coordinate).to_string();
        debug!(%coordinate, %bbox, "searching photos");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("method", SEARCH_METHOD),
                ("api_key", self.api_key.as_str()),
                ("bbox", bbox.as_str()),
                ("safe_search", SAFE_SEARCH),
                ("extras", EXTRAS),
                ("format", DATA_FORMAT),
                ("nojsoncallback", NO_JSON_CALLBACK),
            ])
            .send()
            .await?;

        let body = response.bytes().await?;
        let descriptors = parse_search_response(&body)?;
        info!(count = descriptors.len(), "photo search returned");
        Ok(descriptors)
    }
}

#[async_trait]
impl PhotoSearch for FlickrApiProvider {
    async fn search_photos(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<PhotoDescriptor>> {
        FlickrApiProvider::search_photos(self, coordinate).await
    }
}

/// Parse a photo-search response body.
///
/// Expects `{ "photos": { "photo": [ ... ] } }` and returns the photo-object
/// sequence unchanged, in server order, with no per-entry validation.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<PhotoDescriptor>> {
    let parsed: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| Error::Parse("invalid JSON".into()))?;

    let photos = parsed
        .get("photos")
        .and_then(|value| value.as_object())
        .ok_or_else(|| Error::Parse("missing photos".into()))?;

    let photo_list = photos
        .get("photo")
        .filter(|value| value.is_array())
        .ok_or_else(|| Error::Parse("missing photo list".into()))?;

    serde_json::from_value(photo_list.clone())
        .map_err(|_| Error::Parse("missing photo list".into()))
}
