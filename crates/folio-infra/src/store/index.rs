//! In-memory post index: posts ordered by id plus a slug lookup table.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use folio_core::domain::{Post, PostDraft, generate_id};
use folio_core::error::RepoError;

#[derive(Debug, Clone, Default)]
pub(crate) struct PostIndex {
    posts: BTreeMap<String, Post>,
    slugs: HashMap<String, String>,
}

impl PostIndex {
    /// Build an index from loaded posts, rejecting duplicate ids or slugs.
    pub(crate) fn from_posts(posts: Vec<Post>) -> Result<Self, RepoError> {
        let mut index = Self::default();

        for post in posts {
            if index.posts.contains_key(&post.id) {
                return Err(RepoError::Serialization(format!(
                    "duplicate post id '{}'",
                    post.id
                )));
            }
            if index.slugs.contains_key(&post.slug) {
                return Err(RepoError::Serialization(format!(
                    "duplicate post slug '{}'",
                    post.slug
                )));
            }
            index.slugs.insert(post.slug.clone(), post.id.clone());
            index.posts.insert(post.id.clone(), post);
        }

        Ok(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.posts.len()
    }

    /// Every post, newest `created_at` first, ties broken by id descending.
    pub(crate) fn sorted(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Post> {
        self.posts.get(id)
    }

    pub(crate) fn get_by_slug(&self, slug: &str) -> Option<&Post> {
        self.slugs.get(slug).and_then(|id| self.posts.get(id))
    }

    pub(crate) fn insert(
        &mut self,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Result<Post, RepoError> {
        if self.slugs.contains_key(&draft.slug) {
            return Err(RepoError::SlugTaken(draft.slug));
        }

        let mut post = Post::new(draft, now);
        while self.posts.contains_key(&post.id) {
            post.id = generate_id(now);
        }

        self.slugs.insert(post.slug.clone(), post.id.clone());
        self.posts.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    pub(crate) fn revise(
        &mut self,
        id: &str,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Result<Post, RepoError> {
        if self.slugs.get(&draft.slug).is_some_and(|owner| owner != id) {
            return Err(RepoError::SlugTaken(draft.slug));
        }

        let post = self.posts.get_mut(id).ok_or(RepoError::NotFound)?;
        let old_slug = std::mem::take(&mut post.slug);
        post.revise(draft, now);

        self.slugs.remove(&old_slug);
        self.slugs.insert(post.slug.clone(), post.id.clone());
        Ok(post.clone())
    }

    pub(crate) fn remove(&mut self, id: &str) -> Result<Post, RepoError> {
        let post = self.posts.remove(id).ok_or(RepoError::NotFound)?;
        self.slugs.remove(&post.slug);
        Ok(post)
    }
}
