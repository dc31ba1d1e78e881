//! Domain models and value objects

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// Origin that upstream relative permalinks are resolved against
pub const PERMALINK_ORIGIN: &str = "https://reddit.com";

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// One post record as delivered by the upstream listing endpoint.
///
/// Every field is optional. A field holding a value of the wrong JSON type
/// is read as absent, so deserializing an object into a `RawPost` never fails.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subreddit_name_prefixed: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub num_comments: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_utc: Option<f64>,
    /// Path relative to the platform origin, e.g. `/r/rust/comments/abc/`
    #[serde(default, deserialize_with = "lenient")]
    pub permalink: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub post_hint: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_video: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_gallery: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub media: Option<Media>,
    /// Gallery images keyed by media id
    #[serde(default, deserialize_with = "lenient_map")]
    pub media_metadata: Option<MediaMetadataMap>,
    #[serde(default, deserialize_with = "lenient")]
    pub gallery_data: Option<GalleryData>,
}

impl RawPost {
    pub fn is_video(&self) -> bool {
        self.is_video == Some(true)
    }

    pub fn is_gallery(&self) -> bool {
        self.is_gallery == Some(true)
    }
}

/// Embedded media object attached to a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default, deserialize_with = "lenient")]
    pub reddit_video: Option<NativeVideo>,
    #[serde(default, deserialize_with = "lenient")]
    pub oembed: Option<Oembed>,
}

/// Natively hosted video
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NativeVideo {
    #[serde(default, deserialize_with = "lenient")]
    pub fallback_url: Option<String>,
}

/// Third-party rich embed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Oembed {
    #[serde(default, deserialize_with = "lenient")]
    pub html: Option<String>,
}

/// Metadata for one gallery image
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaMetadata {
    /// Source (full resolution) rendition
    #[serde(default, deserialize_with = "lenient")]
    pub s: Option<MediaSource>,
}

/// Gallery metadata entries in the order the upstream document lists them
#[derive(Debug, Clone, Default)]
pub struct MediaMetadataMap(Vec<(String, MediaMetadata)>);

impl MediaMetadataMap {
    pub fn get(&self, media_id: &str) -> Option<&MediaMetadata> {
        self.0
            .iter()
            .find(|(id, _)| id == media_id)
            .map(|(_, entry)| entry)
    }

    /// Entries in document order
    pub fn values(&self) -> impl Iterator<Item = &MediaMetadata> {
        self.0.iter().map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, MediaMetadata)> for MediaMetadataMap {
    fn from_iter<I: IntoIterator<Item = (String, MediaMetadata)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSource {
    /// HTML-entity encoded URL
    #[serde(default, deserialize_with = "lenient")]
    pub u: Option<String>,
}

/// Display order of a gallery
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryData {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub items: Option<Vec<GalleryItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleryItem {
    #[serde(default, deserialize_with = "lenient")]
    pub media_id: Option<String>,
}

/// Normalized description of the media carried by a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaDescriptor {
    /// Native video with a directly playable URL
    Video {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        poster: Option<String>,
    },
    /// Multi-image gallery, in display order
    Gallery { images: Vec<String> },
    /// Single direct image
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Rich embed markup
    Iframe { html: String },
    /// Anything else
    Link {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
    },
}

impl MediaDescriptor {
    /// Variant name as it appears in the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Video { .. } => "video",
            Self::Gallery { .. } => "gallery",
            Self::Image { .. } => "image",
            Self::Iframe { .. } => "iframe",
            Self::Link { .. } => "link",
        }
    }
}

/// A post in the uniform shape served to the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_utc: Option<f64>,
    pub media: MediaDescriptor,
    /// Absolute URL of the post on the source platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
}

/// Parameters for fetching one page of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    /// Opaque cursor returned by the previous page
    pub after: Option<String>,
    pub limit: u32,
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self {
            after: None,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One raw page as returned by a feed source
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub posts: Vec<RawPost>,
    pub after: Option<String>,
}

/// One normalized page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPage {
    pub posts: Vec<NormalizedPost>,
    pub next_page_token: Option<String>,
}

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Access and refresh tokens issued together on login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Read any JSON value, keeping it only if it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], but drops malformed elements instead of the whole sequence.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

/// Like [`lenient`], but drops malformed entries instead of the whole map.
/// Object keys keep document order (serde_json `preserve_order`).
fn lenient_map<'de, D>(deserializer: D) -> Result<Option<MediaMetadataMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|(key, entry)| serde_json::from_value(entry).ok().map(|v| (key, v)))
            .collect(),
    ))
}
