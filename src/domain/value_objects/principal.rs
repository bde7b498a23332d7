use crate::domain::constants::ANONYMOUS_PRINCIPAL;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_PRINCIPAL_LEN: usize = 63;
const GROUP_LEN: usize = 5;

/// 分散 ID の呼び出し元を表すテキスト表現
///
/// base32 小文字（`a-z`, `2-7`）を 5 文字ごとに `-` で区切った形式。
/// 最後のグループのみ 1〜5 文字を許容する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    pub fn new(value: String) -> Result<Self, String> {
        if value.is_empty() {
            return Err("Principal cannot be empty".to_string());
        }
        if value.len() > MAX_PRINCIPAL_LEN {
            return Err("Invalid principal format: too long".to_string());
        }

        let groups: Vec<&str> = value.split('-').collect();
        let last = groups.len() - 1;
        for (index, group) in groups.iter().enumerate() {
            let valid_len = if index == last {
                (1..=GROUP_LEN).contains(&group.len())
            } else {
                group.len() == GROUP_LEN
            };
            if !valid_len {
                return Err(format!("Invalid principal format: bad group '{group}'"));
            }
            if !group
                .chars()
                .all(|c| c.is_ascii_lowercase() || ('2'..='7').contains(&c))
            {
                return Err(format!("Invalid principal format: bad characters in '{group}'"));
            }
        }

        Ok(Self(value))
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_PRINCIPAL.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_PRINCIPAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 先頭 `prefix` 文字 + `...` に短縮する。十分に短い場合はそのまま返す。
    pub fn truncated(&self, prefix: usize) -> String {
        truncate_principal(&self.0, prefix)
    }
}

pub fn truncate_principal(principal: &str, prefix: usize) -> String {
    if principal.chars().count() <= prefix + 3 {
        return principal.to_string();
    }
    let head: String = principal.chars().take(prefix).collect();
    format!("{head}...")
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

impl TryFrom<&str> for Principal {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}
