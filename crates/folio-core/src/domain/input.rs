//! Inbound post payloads: sanitisation and validation.
//!
//! A [`PostInput`] is what a client sends. [`PostInput::sanitize`] trims it and
//! fills defaults, [`SanitizedPost::validate`] checks the result and yields a
//! [`PostDraft`], the only thing the content store accepts.

use serde::Deserialize;
use serde::de::IgnoredAny;

use super::post::{Post, PostStatus};
use super::slug::{derive_excerpt, generate_slug};
use crate::error::ValidationErrors;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_AUTHOR: &str = "Admin";

/// Post payload as received from a client.
///
/// Every field is optional. Unknown fields are rejected; the server-assigned
/// `id`, `createdAt` and `updatedAt` are tolerated so a fetched post can be
/// sent back unchanged, but their values are discarded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostInput {
    title: Option<String>,
    slug: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    featured_image: Option<String>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    status: Option<String>,
    author: Option<String>,
    seo_title: Option<String>,
    seo_description: Option<String>,

    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default, rename = "createdAt")]
    _created_at: Option<IgnoredAny>,
    #[serde(default, rename = "updatedAt")]
    _updated_at: Option<IgnoredAny>,
}

impl PostInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn featured_image(mut self, url: impl Into<String>) -> Self {
        self.featured_image = Some(url.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn seo_title(mut self, seo_title: impl Into<String>) -> Self {
        self.seo_title = Some(seo_title.into());
        self
    }

    pub fn seo_description(mut self, seo_description: impl Into<String>) -> Self {
        self.seo_description = Some(seo_description.into());
        self
    }

    /// Fill every field the payload leaves out with the stored post's value.
    ///
    /// An excerpt that was derived from the stored content is dropped when the
    /// payload brings new content, so it is derived again from the new body.
    pub fn merged_over(self, existing: &Post) -> Self {
        let content_replaced = self.content.is_some();
        let stored_excerpt = || {
            let derived = content_replaced && existing.excerpt == derive_excerpt(&existing.content);
            (!derived).then(|| existing.excerpt.clone())
        };

        Self {
            title: self.title.or_else(|| Some(existing.title.clone())),
            slug: self.slug.or_else(|| Some(existing.slug.clone())),
            content: self.content.or_else(|| Some(existing.content.clone())),
            excerpt: self.excerpt.or_else(stored_excerpt),
            featured_image: self.featured_image.or_else(|| existing.featured_image.clone()),
            category: self.category.or_else(|| Some(existing.category.clone())),
            tags: self.tags.or_else(|| Some(existing.tags.clone())),
            status: self
                .status
                .or_else(|| Some(existing.status.as_str().to_string())),
            author: self.author.or_else(|| Some(existing.author.clone())),
            seo_title: self.seo_title.or_else(|| existing.seo_title.clone()),
            seo_description: self
                .seo_description
                .or_else(|| existing.seo_description.clone()),
            ..Self::default()
        }
    }

    /// Trim every field and apply defaults. Never fails.
    pub fn sanitize(self) -> SanitizedPost {
        let title = clean(self.title).unwrap_or_default();
        let content = clean(self.content).unwrap_or_default();

        let slug = clean(self.slug)
            .map(|s| generate_slug(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| generate_slug(&title));

        let excerpt = clean(self.excerpt).unwrap_or_else(|| derive_excerpt(&content));

        let tags = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| clean(Some(tag)))
            .collect();

        SanitizedPost {
            title,
            slug,
            content,
            excerpt,
            featured_image: clean(self.featured_image),
            category: clean(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags,
            status: clean(self.status).unwrap_or_else(|| PostStatus::Draft.as_str().to_string()),
            author: clean(self.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            seo_title: clean(self.seo_title),
            seo_description: clean(self.seo_description),
        }
    }

    /// Sanitise then validate in one step.
    pub fn into_draft(self) -> Result<PostDraft, ValidationErrors> {
        self.sanitize().validate()
    }
}

/// A payload after trimming and defaulting, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub status: String,
    pub author: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

impl SanitizedPost {
    /// Check every constraint and report all violations together.
    pub fn validate(self) -> Result<PostDraft, ValidationErrors> {
        let mut errors = Vec::new();

        if self.title.is_empty() {
            errors.push("Title is required".to_string());
        }
        if self.slug.is_empty() {
            errors.push("Slug is required".to_string());
        }
        if self.content.is_empty() {
            errors.push("Content is required".to_string());
        }
        let status = self.status.parse::<PostStatus>();
        if status.is_err() {
            errors.push("Status must be either 'draft' or 'published'".to_string());
        }

        match status {
            Ok(status) if errors.is_empty() => Ok(PostDraft {
                title: self.title,
                slug: self.slug,
                content: self.content,
                excerpt: self.excerpt,
                featured_image: self.featured_image,
                category: self.category,
                tags: self.tags,
                status,
                author: self.author,
                seo_title: self.seo_title,
                seo_description: self.seo_description,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

/// The editable fields of a post, sanitised and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub featured_image: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub author: String,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
