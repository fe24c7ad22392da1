//! JSON file persistence: the whole collection as one pretty-printed array.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use folio_core::domain::Post;
use folio_core::error::RepoError;

/// Read the collection, creating an empty file when none exists yet.
pub(crate) async fn load(path: &Path) -> Result<Vec<Post>, RepoError> {
    match fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Post file missing, creating an empty one");
            save(path, &[]).await?;
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Replace the file's contents with `posts`.
///
/// Writes a sibling temp file first and renames it over the target, so a
/// crash mid-write never leaves a truncated collection behind.
pub(crate) async fn save(path: &Path, posts: &[Post]) -> Result<(), RepoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_vec_pretty(posts)?;
    let tmp = temp_path(path);
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("posts.json");

        let posts = load(&path).await.unwrap();

        assert!(posts.is_empty());
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.trim(), "[]");
    }

    #[tokio::test]
    async fn test_load_treats_blank_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "  \n").unwrap();

        assert!(load(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = load(&path).await;

        assert!(matches!(result, Err(RepoError::Serialization(_))));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let tmp = temp_path(Path::new("/data/posts.json"));
        assert_eq!(tmp, PathBuf::from("/data/posts.json.tmp"));
    }
}
