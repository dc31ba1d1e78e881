//! Raw post to normalized post mapping

use crate::model::{NormalizedPost, PERMALINK_ORIGIN, RawPost};
use crate::usecases::media::MediaClassifier;

/// Map a raw upstream post into the shape served to the frontend
pub fn normalize_post(post: &RawPost) -> NormalizedPost {
    NormalizedPost {
        id: post.id.clone(),
        title: post.title.clone(),
        subreddit: post.subreddit_name_prefixed.clone(),
        author: post.author.clone(),
        score: post.score,
        num_comments: post.num_comments,
        created_utc: post.created_utc,
        media: MediaClassifier::classify(post),
        permalink: post
            .permalink
            .as_deref()
            .map(|path| format!("{}{}", PERMALINK_ORIGIN, path)),
    }
}
