use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// 入力バリデーション失敗の理由。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValidationFailureKind {
    /// 汎用的なバリデーションエラー。
    Generic,
    /// タイトルが空（trim 後）。
    EmptyTitle,
    /// 本文が空（trim 後）。
    EmptyBody,
    /// エディタで写真が必須なのに添付されていない。
    PhotoRequired,
    /// 受け付けない MIME タイプの画像。
    PhotoInvalidType,
    /// 5MB を超える画像。
    PhotoTooLarge,
    /// 数値として解釈できない投稿 ID。
    MalformedPostId,
    /// Principal のテキスト表現が不正。
    MalformedPrincipal,
}

impl ValidationFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationFailureKind::Generic => "generic",
            ValidationFailureKind::EmptyTitle => "empty_title",
            ValidationFailureKind::EmptyBody => "empty_body",
            ValidationFailureKind::PhotoRequired => "photo_required",
            ValidationFailureKind::PhotoInvalidType => "photo_invalid_type",
            ValidationFailureKind::PhotoTooLarge => "photo_too_large",
            ValidationFailureKind::MalformedPostId => "malformed_post_id",
            ValidationFailureKind::MalformedPrincipal => "malformed_principal",
        }
    }
}

impl fmt::Display for ValidationFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationFailureKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(ValidationFailureKind::Generic),
            "empty_title" => Ok(ValidationFailureKind::EmptyTitle),
            "empty_body" => Ok(ValidationFailureKind::EmptyBody),
            "photo_required" => Ok(ValidationFailureKind::PhotoRequired),
            "photo_invalid_type" => Ok(ValidationFailureKind::PhotoInvalidType),
            "photo_too_large" => Ok(ValidationFailureKind::PhotoTooLarge),
            "malformed_post_id" => Ok(ValidationFailureKind::MalformedPostId),
            "malformed_principal" => Ok(ValidationFailureKind::MalformedPrincipal),
            _ => Err(()),
        }
    }
}
