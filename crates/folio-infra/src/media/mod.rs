//! Image uploads: policy checks and data-URL encoding.
//!
//! Uploaded images are not stored anywhere. They are returned as `data:`
//! URLs which the admin UI embeds in a post's `featuredImage` or content.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Image MIME types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// Default upload cap: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("File too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported file type '{0}'. Allowed: jpeg, png, gif, webp, svg")]
    UnsupportedType(String),

    #[error("Empty file")]
    Empty,
}

/// Limits applied to uploaded images.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    pub max_bytes: usize,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ImagePolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Normalised MIME type if it is on the allow-list.
    pub fn check_type(&self, content_type: Option<&str>) -> Result<String, MediaError> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .unwrap_or_default();

        if ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
            Ok(mime)
        } else {
            Err(MediaError::UnsupportedType(mime))
        }
    }

    /// Fail as soon as a partially received upload exceeds the cap.
    pub fn check_size(&self, size: usize) -> Result<(), MediaError> {
        if size > self.max_bytes {
            return Err(MediaError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Validate a complete upload and encode it as a data URL.
    pub fn encode(&self, content_type: Option<&str>, bytes: &[u8]) -> Result<String, MediaError> {
        let mime = self.check_type(content_type)?;
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        self.check_size(bytes.len())?;

        Ok(to_data_url(&mime, bytes))
    }
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png() {
        let policy = ImagePolicy::default();

        let url = policy.encode(Some("image/png"), b"\x89PNG").unwrap();

        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let policy = ImagePolicy::default();

        assert_eq!(
            policy.check_type(Some("Image/JPEG; charset=binary")).unwrap(),
            "image/jpeg"
        );
    }

    #[test]
    fn test_rejects_non_images() {
        let policy = ImagePolicy::default();

        assert!(matches!(
            policy.encode(Some("application/pdf"), b"%PDF"),
            Err(MediaError::UnsupportedType(t)) if t == "application/pdf"
        ));
        assert!(matches!(
            policy.encode(None, b"data"),
            Err(MediaError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_and_empty() {
        let policy = ImagePolicy::new(4);

        assert!(matches!(
            policy.encode(Some("image/gif"), b"GIF89a"),
            Err(MediaError::TooLarge { size: 6, max: 4 })
        ));
        assert!(matches!(
            policy.encode(Some("image/gif"), b""),
            Err(MediaError::Empty)
        ));
    }
}
