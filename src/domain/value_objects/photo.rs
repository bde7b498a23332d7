use crate::domain::constants::LEGACY_PHOTO_SENTINEL;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 投稿に表示できる写真があるかどうかの唯一の判定。
///
/// 空文字列・空白のみ・`"legacy"` プレースホルダはすべて「写真なし」。
pub fn is_displayable(photo: &str) -> bool {
    if photo.is_empty() || photo == LEGACY_PHOTO_SENTINEL {
        return false;
    }
    !photo.trim().is_empty()
}

/// 自己記述的なテキスト表現の画像（通常は data URL）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn new(value: String) -> Result<Self, String> {
        if !is_displayable(&value) {
            return Err("Encoded image must be a non-empty, non-legacy value".to_string());
        }
        Ok(Self(value))
    }

    pub fn from_parts(content_type: &str, payload_b64: &str) -> Self {
        Self(format!("data:{content_type};base64,{payload_b64}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// data URL から MIME タイプを取り出す。data URL でなければ `None`。
    pub fn content_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let (meta, _) = rest.split_once(',')?;
        let mime = meta.split(';').next().unwrap_or_default();
        if mime.is_empty() { None } else { Some(mime) }
    }

    /// 保存形式はそのまま表示ソースとして使える
    pub fn preview_url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 投稿の写真の有無を明示するタグ付き表現
///
/// シリアライズ時はリモートサービスと同じ単一の文字列フィールドになる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostPhoto {
    #[default]
    Absent,
    /// 写真対応以前の投稿
    Legacy,
    Present(EncodedImage),
}

impl PostPhoto {
    pub fn from_wire(value: &str) -> Self {
        if value == LEGACY_PHOTO_SENTINEL {
            return PostPhoto::Legacy;
        }
        if !is_displayable(value) {
            return PostPhoto::Absent;
        }
        PostPhoto::Present(EncodedImage(value.to_string()))
    }

    pub fn to_wire(&self) -> String {
        match self {
            PostPhoto::Absent => String::new(),
            PostPhoto::Legacy => LEGACY_PHOTO_SENTINEL.to_string(),
            PostPhoto::Present(image) => image.as_str().to_string(),
        }
    }

    pub fn is_displayable(&self) -> bool {
        matches!(self, PostPhoto::Present(_))
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        match self {
            PostPhoto::Present(image) => Some(image),
            _ => None,
        }
    }

    /// 表示可能な場合のみプレビュー URL を返す
    pub fn preview_url(&self) -> Option<&str> {
        self.image().map(EncodedImage::preview_url)
    }
}

impl From<String> for PostPhoto {
    fn from(wire: String) -> Self {
        PostPhoto::from_wire(&wire)
    }
}

impl From<PostPhoto> for String {
    fn from(photo: PostPhoto) -> Self {
        photo.to_wire()
    }
}

impl From<EncodedImage> for PostPhoto {
    fn from(image: EncodedImage) -> Self {
        PostPhoto::Present(image)
    }
}
