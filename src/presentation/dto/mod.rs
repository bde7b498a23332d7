// DTOモジュール
pub mod post_dto;
pub mod user_dto;

// 共通のレスポンス型
use crate::shared::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub error_code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    /// 画面に出す文言を呼び出し側で決める失敗
    pub fn failure(message: impl Into<String>, error_code: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_code: Some(error_code.to_string()),
        }
    }

    pub fn from_app_error(error: AppError) -> Self {
        Self::failure(error.user_message(), error.code())
    }

    pub fn from_result(result: crate::shared::Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_app_error(err),
        }
    }
}

// バリデーショントレイト
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}
