//! Post content store.
//!
//! Posts live in an in-memory [`PostIndex`] (ordered by id, with a slug
//! lookup table) behind a single async `RwLock`. When the store is backed by
//! a file, every mutation is written through to it while the write lock is
//! held, so concurrent writers are serialised and none of them is lost.

mod index;
mod json_file;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use folio_core::domain::{Post, PostDraft, PostInput, PostStats, timestamp_now};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

use index::PostIndex;

/// Post repository over an in-memory index, optionally persisted as JSON.
pub struct PostStore {
    index: RwLock<PostIndex>,
    file: Option<PathBuf>,
}

impl PostStore {
    /// Store without a backing file. Data is lost on process restart.
    pub fn in_memory() -> Self {
        Self {
            index: RwLock::new(PostIndex::default()),
            file: None,
        }
    }

    /// Open (or create) a JSON-file-backed store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let path = path.into();
        let posts = json_file::load(&path).await?;
        let index = PostIndex::from_posts(posts)?;

        tracing::debug!(path = %path.display(), posts = index.len(), "Post store loaded");

        Ok(Self {
            index: RwLock::new(index),
            file: Some(path),
        })
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Apply `change` to a copy of the index, persist the copy, then publish it.
    ///
    /// A failed write leaves the published state untouched.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut PostIndex) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let mut guard = self.index.write().await;
        let mut next = guard.clone();
        let outcome = change(&mut next)?;

        if let Some(path) = &self.file {
            json_file::save(path, &next.sorted()).await.inspect_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "Failed to persist posts");
            })?;
        }

        *guard = next;
        Ok(outcome)
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.index.read().await.sorted())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, RepoError> {
        Ok(self.index.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        Ok(self.index.read().await.get_by_slug(slug).cloned())
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let post = self
            .mutate(|index| index.insert(draft, timestamp_now()))
            .await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, status = %post.status, "Post created");
        Ok(post)
    }

    async fn update(&self, id: &str, input: PostInput) -> Result<Post, RepoError> {
        let post = self
            .mutate(|index| {
                let existing = index.get(id).ok_or(RepoError::NotFound)?;
                let draft = input.merged_over(existing).into_draft()?;
                index.revise(id, draft, timestamp_now())
            })
            .await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, status = %post.status, "Post updated");
        Ok(post)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let post = self.mutate(|index| index.remove(id)).await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post deleted");
        Ok(())
    }

    async fn stats(&self) -> Result<PostStats, RepoError> {
        let index = self.index.read().await;
        Ok(PostStats::from_posts(&index.sorted()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use folio_core::domain::PostStatus;

    fn input(title: &str, status: &str) -> PostInput {
        PostInput::new()
            .title(title)
            .content(format!("<p>{title} body</p>"))
            .status(status)
    }

    fn draft(title: &str, status: &str) -> PostDraft {
        input(title, status).into_draft().unwrap()
    }

    #[tokio::test]
    async fn test_create_then_find_by_id() {
        let store = PostStore::in_memory();

        let created = store.create(draft("Hello", "draft")).await.unwrap();
        let found = store.find_by_id(&created.id).await.unwrap();

        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_by_slug() {
        let store = PostStore::in_memory();
        let created = store.create(draft("Hello World", "published")).await.unwrap();

        let found = store.find_by_slug("hello-world").await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert!(store.find_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let store = PostStore::in_memory();
        store.create(draft("Same Title", "draft")).await.unwrap();

        let result = store.create(draft("Same Title", "published")).await;

        assert!(matches!(result, Err(RepoError::SlugTaken(slug)) if slug == "same-title"));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_preserves_identity() {
        let store = PostStore::in_memory();
        let created = store.create(draft("Before", "draft")).await.unwrap();

        let updated = store
            .update(&created.id, input("After", "published").slug("after"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.slug, "after");
        assert_eq!(updated.status, PostStatus::Published);
        assert!(store.find_by_slug("before").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_slug_owned_by_another_post() {
        let store = PostStore::in_memory();
        store.create(draft("Taken", "draft")).await.unwrap();
        let other = store.create(draft("Other", "draft")).await.unwrap();

        let result = store
            .update(&other.id, input("Taken", "draft").slug("taken"))
            .await;

        assert!(matches!(result, Err(RepoError::SlugTaken(_))));
        let unchanged = store.find_by_id(&other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.slug, "other");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = PostStore::in_memory();

        let result = store.update("nope", input("Any", "draft")).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_merge() {
        let store = PostStore::in_memory();
        let created = store.create(draft("Valid", "draft")).await.unwrap();

        let result = store
            .update(&created.id, PostInput::new().title("   ").status("archived"))
            .await;

        let Err(RepoError::Invalid(errors)) = &result else {
            panic!("expected validation failure, got {result:?}");
        };
        assert!(errors.messages().iter().any(|m| m == "Title is required"));
        let unchanged = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn test_concurrent_partial_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let store = Arc::new(PostStore::open(&path).await.unwrap());
        let created = store.create(draft("Shared", "draft")).await.unwrap();

        let recategorize = {
            let store = Arc::clone(&store);
            let id = created.id.clone();
            tokio::spawn(async move {
                store.update(&id, PostInput::new().category("Design")).await
            })
        };
        let publish = {
            let store = Arc::clone(&store);
            let id = created.id.clone();
            tokio::spawn(async move {
                store.update(&id, PostInput::new().status("published")).await
            })
        };
        recategorize.await.unwrap().unwrap();
        publish.await.unwrap().unwrap();

        let post = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(post.category, "Design");
        assert_eq!(post.status, PostStatus::Published);

        let reopened = PostStore::open(&path).await.unwrap();
        assert_eq!(reopened.find_by_id(&created.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = PostStore::in_memory();
        let created = store.create(draft("Short lived", "draft")).await.unwrap();

        store.delete(&created.id).await.unwrap();

        assert!(store.find_by_id(&created.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(&created.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_published_is_subset_and_stats() {
        let store = PostStore::in_memory();
        store.create(draft("One", "published")).await.unwrap();
        store.create(draft("Two", "published")).await.unwrap();
        store.create(draft("Three", "draft")).await.unwrap();

        let all = store.list_all().await.unwrap();
        let published = store.list_published().await.unwrap();

        assert_eq!(published.len(), 2);
        assert!(published.iter().all(|p| p.is_published()));
        assert!(published.iter().all(|p| all.contains(p)));

        let stats = store.stats().await.unwrap();
        assert_eq!(
            stats,
            PostStats {
                total: 3,
                published: 2,
                drafts: 1
            }
        );
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");

        let created = {
            let store = PostStore::open(&path).await.unwrap();
            store.create(draft("Persisted", "published")).await.unwrap()
        };

        let reopened = PostStore::open(&path).await.unwrap();
        let found = reopened.find_by_id(&created.id).await.unwrap();

        assert_eq!(found, Some(created));
        assert_eq!(reopened.file(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_file_store_writes_camel_case_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let store = PostStore::open(&path).await.unwrap();

        store.create(draft("On disk", "draft")).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let first = &raw.as_array().unwrap()[0];
        assert_eq!(first["slug"], "on-disk");
        assert!(first.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let store = PostStore::open(&path).await.unwrap();
        store.create(draft("Kept", "draft")).await.unwrap();

        // A directory where the temp file should go makes the write fail.
        std::fs::create_dir(dir.path().join("posts.json.tmp")).unwrap();

        let result = store.create(draft("Lost", "draft")).await;

        assert!(matches!(result, Err(RepoError::Io(_))));
        let titles: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Kept"]);
    }
}
