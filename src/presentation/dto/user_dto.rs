use super::Validate;
use crate::shared::AppError;
use serde::{Deserialize, Serialize};

/// ヘッダーに出すサインイン中の ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDto {
    pub principal: String,
    pub display_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveProfileRequest {
    pub name: String,
}

impl Validate for SaveProfileRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("Please enter your name".to_string()));
        }
        if self.name.chars().count() > 100 {
            return Err(AppError::InvalidInput(
                "Name must be 100 characters or fewer".to_string(),
            ));
        }
        Ok(())
    }
}
