use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Largest accepted featured image, in bytes (5 MiB).
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A featured image that passed type and size checks.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Unique storage name, `bloghub-<millis>-<original name>`.
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        original_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, DomainError> {
        let content_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if !content_type.starts_with("image/") || !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str())
        {
            return Err(DomainError::validation(format!(
                "invalid file type '{content_type}'"
            )));
        }
        if bytes.is_empty() {
            return Err(DomainError::validation("no file uploaded"));
        }
        if bytes.len() > MAX_IMAGE_SIZE {
            return Err(DomainError::validation("file too large (limit is 5 MiB)"));
        }

        let filename = format!(
            "bloghub-{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );

        Ok(Self {
            filename,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Where an image ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub content_type: String,
}

/// Keep the last path component and only characters safe in a URL path.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_image() {
        let upload = ImageUpload::new("cover.png", "image/png", vec![1, 2, 3]).unwrap();
        assert!(upload.filename.starts_with("bloghub-"));
        assert!(upload.filename.ends_with("-cover.png"));
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.size(), 3);
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let upload = ImageUpload::new("a.jpg", "Image/JPEG; charset=binary", vec![0]).unwrap();
        assert_eq!(upload.content_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_non_image_types() {
        for ty in ["text/plain", "application/pdf", "image/svg+xml", ""] {
            let err = ImageUpload::new("a", ty, vec![0]).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{ty}");
        }
    }

    #[test]
    fn test_rejects_empty_and_oversized_bodies() {
        assert!(ImageUpload::new("a.gif", "image/gif", Vec::new()).is_err());
        assert!(ImageUpload::new("a.gif", "image/gif", vec![0; MAX_IMAGE_SIZE]).is_ok());
        assert!(ImageUpload::new("a.gif", "image/gif", vec![0; MAX_IMAGE_SIZE + 1]).is_err());
    }

    #[test]
    fn test_filenames_are_sanitized() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\my cat.webp"), "mycat.webp");
        assert_eq!(sanitize_filename("..."), "image");
        assert_eq!(sanitize_filename(""), "image");
    }
}
