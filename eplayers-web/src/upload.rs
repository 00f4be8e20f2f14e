//! Team image uploads

use std::path::Path;
use tracing::info;

use crate::{ApiError, ApiResult};

/// Largest accepted request body (multipart uploads included)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Reduce a client-supplied filename to its final path component.
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable
/// remains.
pub fn sanitize_filename(raw: &str) -> Option<&str> {
    let name = raw.rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

/// Write an uploaded image into `dir` (created if missing), replacing any
/// file of the same name. Returns the stored filename.
pub async fn save_image(dir: &Path, raw_name: &str, data: &[u8]) -> ApiResult<String> {
    let name = sanitize_filename(raw_name)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid upload filename: {:?}", raw_name)))?
        .to_string();

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&name);
    tokio::fs::write(&path, data).await?;

    info!("Saved team image {} ({} bytes)", path.display(), data.len());
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("fla.png"), Some("fla.png"));
        assert_eq!(sanitize_filename("escudo do time.jpg"), Some("escudo do time.jpg"));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), Some("passwd"));
        assert_eq!(sanitize_filename("C:\\Users\\me\\fla.png"), Some("fla.png"));
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("images/"), None);
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename("a/."), None);
    }

    #[tokio::test]
    async fn test_save_image_creates_folder() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("img/Equipes");

        let name = save_image(&target, "../fla.png", b"PNG").await.unwrap();

        assert_eq!(name, "fla.png");
        assert_eq!(std::fs::read(target.join("fla.png")).unwrap(), b"PNG");
        assert!(!dir.path().join("img/fla.png").exists());
    }

    #[tokio::test]
    async fn test_save_image_rejects_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_image(dir.path(), "..", b"x").await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
