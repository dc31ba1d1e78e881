//! Application use cases / business logic

pub mod feed;
pub mod media;
pub mod normalize;
pub mod session;

pub use feed::{FeedError, FeedUseCase};
pub use media::MediaClassifier;
pub use normalize::normalize_post;
pub use session::SessionUseCase;
