use crate::{dto::Upload, errors::ApiError};
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;
use uuid::Uuid;

/// Subdirectory of the media root holding post images.
const POST_IMAGES: &str = "posts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Png,
    Jpeg,
    Webp,
}

impl ImageKind {
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Gif => "gif",
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::Webp => "webp",
        }
    }
}

/// Identifies an image by its magic bytes.
pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageKind::Gif)
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageKind::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageKind::Jpeg)
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some(ImageKind::Webp)
    } else {
        None
    }
}

/// Keeps the characters that are safe in a file name; the rest become `_`.
fn clean_file_name(raw: &str, kind: ImageKind) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        format!("image.{}", kind.extension())
    } else {
        cleaned.to_string()
    }
}

/// File store for uploaded post images.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the upload under `posts/` and returns its path relative to the
    /// media root. A taken name gets a short random suffix.
    pub async fn save_post_image(&self, upload: &Upload) -> Result<String, ApiError> {
        let kind = sniff(&upload.bytes)
            .ok_or_else(|| ApiError::ValidationError("Upload a valid image.".into()))?;
        let dir = self.root.join(POST_IMAGES);
        fs::create_dir_all(&dir).await?;

        let name = clean_file_name(&upload.filename, kind);
        let mut candidate = name.clone();
        loop {
            let path = dir.join(&candidate);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&upload.bytes).await?;
                    file.flush().await?;
                    let relative = format!("{}/{}", POST_IMAGES, candidate);
                    info!("Image stored: {}", relative);
                    return Ok(relative);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    candidate = with_suffix(&name);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn with_suffix(name: &str) -> String {
    let suffix = &Uuid::new_v4().simple().to_string()[..7];
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, suffix, ext),
        None => format!("{}_{}", name, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    const SMALL_GIF: &[u8] = b"GIF89a\x02\x00\x01\x00\x80\x00\x00\x00\x00\x00\xFF\xFF\xFF\x21\xF9\x04\x00\x00\x00\x00\x00\x2C\x00\x00\x00\x00\x02\x00\x01\x00\x00\x02\x02\x0C\x0A\x00\x3B";

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff(SMALL_GIF), Some(ImageKind::Gif));
        assert_eq!(sniff(b"\xFF\xD8\xFF\xE0rest"), Some(ImageKind::Jpeg));
        assert_eq!(sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(sniff(b"hello"), None);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(clean_file_name("../../etc/passwd", ImageKind::Gif), "passwd");
        assert_eq!(clean_file_name("my cat.gif", ImageKind::Gif), "my_cat.gif");
        assert_eq!(clean_file_name("", ImageKind::Png), "image.png");
        assert_eq!(clean_file_name("..", ImageKind::Gif), "image.gif");
    }

    #[tokio::test]
    async fn taken_names_get_a_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let upload = Upload {
            filename: "small.gif".into(),
            bytes: Bytes::from_static(SMALL_GIF),
        };

        let first = media.save_post_image(&upload).await.unwrap();
        let second = media.save_post_image(&upload).await.unwrap();

        assert_eq!(first, "posts/small.gif");
        assert_ne!(first, second);
        assert!(second.starts_with("posts/small_") && second.ends_with(".gif"));
        assert!(dir.path().join(&second).exists());
    }
}
