use async_trait::async_trait;

use crate::domain::{Post, PostDraft, PostInput, PostStats};
use crate::error::RepoError;

/// Content store for blog posts.
///
/// Implementations own the whole collection. Slug uniqueness is enforced
/// here, atomically with the write, so callers never check-then-insert.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Every post, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;

    /// Published posts only, newest first.
    async fn list_published(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.list_all().await?;
        posts.retain(Post::is_published);
        Ok(posts)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Store a new post. Fails with `SlugTaken` if any post owns the slug.
    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError>;

    /// Apply a partial payload to a stored post.
    ///
    /// The payload is merged over the current record and validated while the
    /// collection is locked, so concurrent partial updates never overwrite
    /// each other. Fails with `NotFound` for an unknown id, `Invalid` if the
    /// merged record does not validate and `SlugTaken` if a different post
    /// owns the resulting slug.
    async fn update(&self, id: &str, input: PostInput) -> Result<Post, RepoError>;

    async fn delete(&self, id: &str) -> Result<(), RepoError>;

    async fn stats(&self) -> Result<PostStats, RepoError> {
        let posts = self.list_all().await?;
        Ok(PostStats::from_posts(&posts))
    }
}
