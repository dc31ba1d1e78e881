//! Media classification
//!
//! Each post is matched against an ordered list of rules. The first rule that
//! produces a descriptor wins, so a native video whose `url` also looks like an
//! image is still a video. A post that matches nothing becomes a link.

use crate::model::{MediaDescriptor, RawPost};

/// URL suffixes treated as direct images (case-sensitive)
const IMAGE_SUFFIXES: [&str; 4] = [".jpeg", ".jpg", ".gif", ".png"];

type Rule = fn(&RawPost) -> Option<MediaDescriptor>;

/// Classification rules in priority order
const RULES: [(&str, Rule); 4] = [
    ("video", video),
    ("gallery", gallery),
    ("image", image),
    ("iframe", iframe),
];

/// Stateless classifier mapping a raw post to its media descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaClassifier;

impl MediaClassifier {
    /// Classify a post. Never fails; unknown shapes fall back to a link.
    pub fn classify(post: &RawPost) -> MediaDescriptor {
        RULES
            .iter()
            .find_map(|(name, rule)| {
                let media = rule(post)?;
                tracing::trace!(post_id = ?post.id, rule = *name, "Media rule matched");
                Some(media)
            })
            .unwrap_or_else(|| link(post))
    }
}

fn video(post: &RawPost) -> Option<MediaDescriptor> {
    if !post.is_video() {
        return None;
    }

    let url = post
        .media
        .as_ref()?
        .reddit_video
        .as_ref()?
        .fallback_url
        .clone()?;

    Some(MediaDescriptor::Video {
        url,
        poster: post.thumbnail.clone(),
    })
}

fn gallery(post: &RawPost) -> Option<MediaDescriptor> {
    if !post.is_gallery() {
        return None;
    }
    let metadata = post.media_metadata.as_ref()?;

    // Display order comes from gallery_data; document order is the fallback.
    let mut images: Vec<String> = post
        .gallery_data
        .as_ref()
        .and_then(|g| g.items.as_ref())
        .into_iter()
        .flatten()
        .filter_map(|item| metadata.get(item.media_id.as_deref()?))
        .filter_map(source_url)
        .collect();

    if images.is_empty() {
        images = metadata.values().filter_map(source_url).collect();
    }

    if images.is_empty() {
        return None;
    }

    Some(MediaDescriptor::Gallery { images })
}

fn image(post: &RawPost) -> Option<MediaDescriptor> {
    let hinted = post.post_hint.as_deref() == Some("image");
    let direct = post
        .url
        .as_deref()
        .is_some_and(|url| IMAGE_SUFFIXES.iter().any(|suffix| url.ends_with(suffix)));

    (hinted || direct).then(|| MediaDescriptor::Image {
        url: post.url.clone(),
    })
}

fn iframe(post: &RawPost) -> Option<MediaDescriptor> {
    let html = post.media.as_ref()?.oembed.as_ref()?.html.clone()?;
    Some(MediaDescriptor::Iframe { html })
}

fn link(post: &RawPost) -> MediaDescriptor {
    MediaDescriptor::Link {
        url: post.url.clone(),
        thumbnail: post.thumbnail.clone(),
    }
}

fn source_url(entry: &crate::model::MediaMetadata) -> Option<String> {
    entry.s.as_ref()?.u.as_deref().map(unescape_amp)
}

/// Upstream URLs are HTML-escaped; only `&amp;` is decoded.
fn unescape_amp(url: &str) -> String {
    url.replace("&amp;", "&")
}
