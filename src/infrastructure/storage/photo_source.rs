use crate::application::ports::photo_source::PhotoSource;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// メモリ上のバイト列をそのまま画像として扱う
#[derive(Debug, Clone)]
pub struct InMemoryPhoto {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl InMemoryPhoto {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[async_trait]
impl PhotoSource for InMemoryPhoto {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// ファイルシステム上の画像。サイズは開いた時点のメタデータ。
#[derive(Debug, Clone)]
pub struct FilePhoto {
    path: PathBuf,
    name: String,
    content_type: String,
    size: u64,
}

impl FilePhoto {
    /// MIME タイプを明示して開く
    pub async fn open(
        path: impl AsRef<Path>,
        content_type: impl Into<String>,
    ) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(AppError::InvalidInput(format!(
                "{} is not a file",
                path.display()
            )));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            name,
            content_type: content_type.into(),
            size: metadata.len(),
        })
    }

    /// 拡張子から MIME タイプを推測して開く。不明な拡張子は空の MIME タイプになる。
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let content_type = guess_content_type(path.as_ref());
        Self::open(path, content_type).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PhotoSource for FilePhoto {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_all(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "",
    }
}
