//! Domain entities - the core business objects.

mod input;
mod post;
mod slug;
mod stats;

pub use input::{DEFAULT_AUTHOR, DEFAULT_CATEGORY, PostDraft, PostInput, SanitizedPost};
pub use post::{Post, PostStatus, UnknownStatus, generate_id, timestamp_now};
pub use slug::{EXCERPT_LENGTH, derive_excerpt, generate_slug};
pub use stats::PostStats;
