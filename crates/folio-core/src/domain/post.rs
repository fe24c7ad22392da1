use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::input::PostDraft;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is neither `draft` nor `published`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown post status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for PostStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Post entity - a single blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post from a validated draft, assigning id and timestamps.
    pub fn new(draft: PostDraft, now: DateTime<Utc>) -> Self {
        let PostDraft {
            title,
            slug,
            content,
            excerpt,
            featured_image,
            category,
            tags,
            status,
            author,
            seo_title,
            seo_description,
        } = draft;

        Self {
            id: generate_id(now),
            title,
            slug,
            content,
            excerpt,
            featured_image,
            category,
            tags,
            status,
            author,
            seo_title,
            seo_description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field with the draft's values.
    ///
    /// `id` and `created_at` are untouched and `updated_at` never moves backwards.
    pub fn revise(&mut self, draft: PostDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.slug = draft.slug;
        self.content = draft.content;
        self.excerpt = draft.excerpt;
        self.featured_image = draft.featured_image;
        self.category = draft.category;
        self.tags = draft.tags;
        self.status = draft.status;
        self.author = draft.author;
        self.seo_title = draft.seo_title;
        self.seo_description = draft.seo_description;
        self.updated_at = self.updated_at.max(now);
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Current time truncated to milliseconds, the precision posts are stored at.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Opaque post id: creation time in milliseconds plus a random suffix.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.timestamp_millis(), &suffix[..8])
}

/// `2024-05-01T09:30:00.000Z`: always three fractional digits, `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn draft(title: &str, slug: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            slug: slug.to_string(),
            content: "<p>Body</p>".to_string(),
            excerpt: "Body".to_string(),
            featured_image: None,
            category: "General".to_string(),
            tags: vec![],
            status: PostStatus::Draft,
            author: "Admin".to_string(),
            seo_title: None,
            seo_description: None,
        }
    }

    #[test]
    fn test_new_assigns_id_and_timestamps() {
        let now = timestamp_now();
        let post = Post::new(draft("Hello", "hello"), now);

        assert!(post.id.starts_with(&now.timestamp_millis().to_string()));
        assert_eq!(post.created_at, now);
        assert_eq!(post.updated_at, now);
        assert_eq!(post.slug, "hello");
    }

    #[test]
    fn test_generated_ids_differ() {
        let now = timestamp_now();
        assert_ne!(generate_id(now), generate_id(now));
    }

    #[test]
    fn test_revise_keeps_identity() {
        let created = timestamp_now();
        let mut post = Post::new(draft("Hello", "hello"), created);
        let id = post.id.clone();

        let later = created + TimeDelta::milliseconds(5);
        let mut next = draft("Hello again", "hello-again");
        next.status = PostStatus::Published;
        post.revise(next, later);

        assert_eq!(post.id, id);
        assert_eq!(post.created_at, created);
        assert_eq!(post.updated_at, later);
        assert_eq!(post.title, "Hello again");
        assert!(post.is_published());
    }

    #[test]
    fn test_revise_never_moves_updated_at_backwards() {
        let created = timestamp_now();
        let mut post = Post::new(draft("Hello", "hello"), created);

        post.revise(draft("Hello", "hello"), created - TimeDelta::seconds(10));

        assert_eq!(post.updated_at, created);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("draft".parse::<PostStatus>(), Ok(PostStatus::Draft));
        assert_eq!("published".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut post = Post::new(draft("Hello", "hello"), timestamp_now());
        post.featured_image = Some("https://example.com/a.png".to_string());

        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["featuredImage"], "https://example.com/a.png");
        assert_eq!(json["status"], "draft");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("seoTitle").is_none());
    }

    #[test]
    fn test_timestamps_keep_millisecond_precision() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let post = Post::new(draft("Hello", "hello"), at);

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["createdAt"], "2024-05-01T09:30:00.000Z");

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back.created_at, at);
    }
}
