use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::utils::validation::field_error;

const IMAGE_EXTS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    ProfilePhoto,
    IntroVideo,
    Resume,
    CompanyLogo,
}

impl AssetKind {
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "profile_photo" => Some(AssetKind::ProfilePhoto),
            "intro_video" => Some(AssetKind::IntroVideo),
            "resume" => Some(AssetKind::Resume),
            "company_logo" => Some(AssetKind::CompanyLogo),
            _ => None,
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            AssetKind::ProfilePhoto => "profile_photo",
            AssetKind::IntroVideo => "intro_video",
            AssetKind::Resume => "resume",
            AssetKind::CompanyLogo => "company_logo",
        }
    }

    pub fn upload_dir(self) -> &'static str {
        match self {
            AssetKind::ProfilePhoto => "profile_photos",
            AssetKind::IntroVideo => "intro_videos",
            AssetKind::Resume => "resumes",
            AssetKind::CompanyLogo => "company_logos",
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, AssetKind::ProfilePhoto | AssetKind::CompanyLogo)
    }
}

/// A file part received in a multipart body, not yet written to disk.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub kind: AssetKind,
    pub file_name: String,
    pub data: Bytes,
}

/// Files live under `root/<upload_dir>/`; records keep the path relative to `root`.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            root: root.into(),
            base_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.media_root.clone(), config.media_url.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Rejects empty files and images whose extension or leading bytes do not match.
    pub fn check(&self, upload: &AssetUpload) -> Result<()> {
        let field = upload.kind.field_name();
        if upload.data.is_empty() {
            return Err(field_error(field, "empty", "The submitted file is empty.").into());
        }
        if upload.kind.is_image() {
            check_image(field, extension_of(&upload.file_name).as_deref(), &upload.data)?;
        }
        Ok(())
    }

    /// Checks every upload before writing any. When a write fails the files
    /// already written are removed again.
    pub async fn save_all(&self, uploads: &[AssetUpload]) -> Result<Vec<(AssetKind, String)>> {
        for upload in uploads {
            self.check(upload)?;
        }

        let mut stored: Vec<(AssetKind, String)> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.write(upload).await {
                Ok(path) => stored.push((upload.kind, path)),
                Err(e) => {
                    let paths: Vec<&str> = stored.iter().map(|(_, path)| path.as_str()).collect();
                    self.remove_all(paths).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    /// Best effort: a file that cannot be removed is logged and skipped.
    pub async fn remove_all<'a>(&self, paths: impl IntoIterator<Item = &'a str>) {
        for path in paths {
            let full = self.root.join(path);
            if let Err(e) = fs::remove_file(&full).await {
                tracing::warn!("Failed to remove orphaned upload {}: {}", full.display(), e);
            }
        }
    }

    async fn write(&self, upload: &AssetUpload) -> Result<String> {
        let field = upload.kind.field_name();
        let dir = self.root.join(upload.kind.upload_dir());
        fs::create_dir_all(&dir).await.map_err(|e| {
            tracing::error!("Failed to create media directory {}: {}", dir.display(), e);
            Error::Internal(format!("Failed to prepare media storage: {}", e))
        })?;

        let file_name = match extension_of(&upload.file_name) {
            Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
            None => uuid::Uuid::new_v4().to_string(),
        };
        fs::write(dir.join(&file_name), &upload.data).await.map_err(|e| {
            tracing::error!("Failed to write {} upload: {}", field, e);
            Error::Internal(format!("Failed to save file: {}", e))
        })?;

        let relative = format!("{}/{}", upload.kind.upload_dir(), file_name);
        tracing::debug!(field, path = %relative, bytes = upload.data.len(), "Stored asset");
        Ok(relative)
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn check_image(field: &'static str, ext: Option<&str>, data: &[u8]) -> Result<()> {
    let invalid = || {
        Error::from(field_error(
            field,
            "invalid_image",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        ))
    };

    let ext = ext.filter(|e| IMAGE_EXTS.contains(e)).ok_or_else(invalid)?;
    let valid = match ext {
        "jpg" | "jpeg" => data.starts_with(&[0xFF, 0xD8]),
        "png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        "gif" => data.starts_with(b"GIF8"),
        "webp" => data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP",
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(invalid())
    }
}
