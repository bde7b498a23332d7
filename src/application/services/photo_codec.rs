use crate::application::ports::photo_source::PhotoSource;
use crate::domain::constants::{ACCEPTED_IMAGE_TYPES, MAX_PHOTO_BYTES};
use crate::domain::value_objects::{EncodedImage, PostPhoto};
use crate::shared::error::AppError;
use crate::shared::validation::ValidationFailureKind;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;
use tracing::debug;

pub use crate::domain::value_objects::is_displayable;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// 画像を受け付けない理由。型のチェックがサイズより先に行われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhotoRejection {
    #[error("invalid type")]
    InvalidType,
    #[error("too large")]
    TooLarge,
}

impl PhotoRejection {
    pub fn user_message(&self) -> &'static str {
        match self {
            PhotoRejection::InvalidType => {
                "Please select a valid image file (JPEG, PNG, GIF, or WebP)"
            }
            PhotoRejection::TooLarge => "Image file size must be less than 5MB",
        }
    }

    pub fn kind(&self) -> ValidationFailureKind {
        match self {
            PhotoRejection::InvalidType => ValidationFailureKind::PhotoInvalidType,
            PhotoRejection::TooLarge => ValidationFailureKind::PhotoTooLarge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoValidation {
    pub valid: bool,
    pub error: Option<PhotoRejection>,
}

impl PhotoValidation {
    fn accepted() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn rejected(reason: PhotoRejection) -> Self {
        Self {
            valid: false,
            error: Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), PhotoRejection> {
        match self.error {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PhotoCodecError {
    #[error("Failed to read image file")]
    Read(#[source] std::io::Error),

    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

impl From<PhotoCodecError> for AppError {
    fn from(err: PhotoCodecError) -> Self {
        match err {
            PhotoCodecError::Read(e) => AppError::Storage(format!("Failed to read image file: {e}")),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

impl From<PhotoRejection> for AppError {
    fn from(reason: PhotoRejection) -> Self {
        AppError::validation(reason.kind(), reason.user_message())
    }
}

/// エンコード済みの写真と元の MIME タイプ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoData {
    pub data_url: EncodedImage,
    pub content_type: String,
}

impl From<PhotoData> for PostPhoto {
    fn from(data: PhotoData) -> Self {
        PostPhoto::Present(data.data_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPhoto {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 申告された MIME タイプとサイズだけで判定する
pub fn validate_metadata(content_type: &str, size: u64) -> PhotoValidation {
    if !ACCEPTED_IMAGE_TYPES.contains(&content_type) {
        return PhotoValidation::rejected(PhotoRejection::InvalidType);
    }
    if size > MAX_PHOTO_BYTES {
        return PhotoValidation::rejected(PhotoRejection::TooLarge);
    }
    PhotoValidation::accepted()
}

pub fn validate(file: &dyn PhotoSource) -> PhotoValidation {
    validate_metadata(file.content_type(), file.size())
}

/// ファイル全体を読み込んで `data:<mime>;base64,<payload>` にする
pub async fn encode(file: &dyn PhotoSource) -> Result<PhotoData, PhotoCodecError> {
    let bytes = file.read_all().await.map_err(PhotoCodecError::Read)?;
    let content_type = match file.content_type() {
        "" => FALLBACK_CONTENT_TYPE,
        declared => declared,
    };
    debug!(
        name = %file.name(),
        content_type = %content_type,
        bytes = bytes.len(),
        "encoding photo"
    );
    Ok(PhotoData {
        data_url: EncodedImage::from_parts(content_type, &STANDARD.encode(&bytes)),
        content_type: file.content_type().to_string(),
    })
}

/// data URL を MIME タイプとバイト列に戻す
pub fn decode(image: &EncodedImage) -> Result<DecodedPhoto, PhotoCodecError> {
    let raw = image.as_str();
    let malformed = || PhotoCodecError::MalformedDataUrl(truncate_for_error(raw));

    let rest = raw.strip_prefix("data:").ok_or_else(malformed)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(malformed)?;
    let content_type = meta.strip_suffix(";base64").ok_or_else(malformed)?;
    let content_type = match content_type.split(';').next() {
        Some(mime) if !mime.is_empty() => mime,
        _ => FALLBACK_CONTENT_TYPE,
    };

    let bytes = STANDARD.decode(payload)?;
    Ok(DecodedPhoto {
        content_type: content_type.to_string(),
        bytes,
    })
}

/// 表示用のソース。表示可能な写真にしか存在しない。
pub fn preview_url(photo: &PostPhoto) -> Option<&str> {
    photo.preview_url()
}

/// ファイル選択ダイアログ向けのカンマ区切り MIME 一覧
pub fn accepted_image_types() -> String {
    ACCEPTED_IMAGE_TYPES.join(",")
}

fn truncate_for_error(raw: &str) -> String {
    const MAX: usize = 32;
    if raw.chars().count() <= MAX {
        raw.to_string()
    } else {
        let head: String = raw.chars().take(MAX).collect();
        format!("{head}...")
    }
}
