use serde::{Deserialize, Serialize};

use super::post::Post;

/// Aggregate post counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
}

impl PostStats {
    pub fn from_posts<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Self {
        posts.into_iter().fold(Self::default(), |mut stats, post| {
            stats.total += 1;
            if post.is_published() {
                stats.published += 1;
            } else {
                stats.drafts += 1;
            }
            stats
        })
    }
}
