use serde_json::{Map, Value};

use crate::ids::{PhotoId, PinId};

/// A single search-result entry describing one remote photo.
///
/// Only `url_m` is ever consumed; every other key the server returned is
/// preserved untouched so descriptors round-trip the response shape exactly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoDescriptor {
    /// Medium-size image URL, present when the server honored the `extras`
    /// request. Descriptors without it are carried through search results
    /// and skipped at record-creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_m: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted photo entity: a remote URL owned by exactly one pin.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoRecord {
    pub id: PhotoId,
    pub pin_id: PinId,
    pub remote_url: String,
}

impl PhotoRecord {
    pub fn new(pin_id: PinId, remote_url: impl Into<String>) -> Self {
        Self {
            id: PhotoId::new(),
            pin_id,
            remote_url: remote_url.into(),
        }
    }

    /// Cache identifier for this record's image bytes.
    ///
    /// Derivable from `remote_url` alone, so cache lookups never consult the
    /// persisted store.
    pub fn cache_key(&self) -> String {
        cache_key_for(&self.remote_url)
    }
}

/// Derive the cache identifier from a remote image URL.
///
/// The key is the final path segment. Keys must not contain path separators,
/// which both cache tiers treat as structure.
pub fn cache_key_for(remote_url: &str) -> String {
    let path = url::Url::parse(remote_url)
        .map(|parsed| parsed.path().to_owned())
        .unwrap_or_else(|_| remote_url.to_owned());

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(path.as_str())
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_final_path_segment() {
        assert_eq!(
            cache_key_for("https://farm1.staticflickr.com/2/1418_5a9_m.jpg"),
            "1418_5a9_m.jpg"
        );
    }

    #[test]
    fn cache_key_ignores_trailing_slash_and_query() {
        assert_eq!(
            cache_key_for("https://example.com/a/b/photo.jpg?x=1"),
            "photo.jpg"
        );
        assert_eq!(cache_key_for("https://example.com/a/b/"), "b");
    }

    #[test]
    fn cache_key_falls_back_for_unparseable_input() {
        assert_eq!(cache_key_for("plain_name.jpg"), "plain_name.jpg");
    }

    #[test]
    fn descriptor_preserves_unknown_keys() {
        let raw = serde_json::json!({
            "id": "523", "title": "harbor", "url_m": "https://x/y.jpg"
        });
        let descriptor: PhotoDescriptor =
            serde_json::from_value(raw).unwrap();
        assert_eq!(descriptor.url_m.as_deref(), Some("https://x/y.jpg"));
        assert_eq!(descriptor.extra["title"], "harbor");
        assert_eq!(descriptor.extra["id"], "523");
    }
}
