use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub photo: PhotoConfig,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoConfig {
    /// エディタで写真の添付を必須にするか（サービス層には影響しない）
    pub require_photo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// 0 の場合、無効化されるまでエントリは新鮮なまま
    pub stale_after_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    pub preview_chars: usize,
    pub principal_prefix: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            photo: PhotoConfig {
                require_photo: true,
            },
            cache: CacheConfig {
                stale_after_secs: 0,
            },
            display: DisplayConfig {
                preview_chars: 200,
                principal_prefix: 8,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("FAMILY_BLOG_REQUIRE_PHOTO") {
            cfg.photo.require_photo = parse_bool(&v, cfg.photo.require_photo);
        }
        if let Ok(v) = std::env::var("FAMILY_BLOG_CACHE_STALE_SECS")
            && let Some(value) = parse_u64(&v)
        {
            cfg.cache.stale_after_secs = value;
        }
        if let Ok(v) = std::env::var("FAMILY_BLOG_PREVIEW_CHARS")
            && let Some(value) = parse_usize(&v)
        {
            cfg.display.preview_chars = value;
        }
        if let Ok(v) = std::env::var("FAMILY_BLOG_PRINCIPAL_PREFIX")
            && let Some(value) = parse_usize(&v)
        {
            cfg.display.principal_prefix = value;
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.display.preview_chars == 0 {
            return Err("Display preview_chars must be greater than 0".to_string());
        }
        if self.display.principal_prefix == 0 {
            return Err("Display principal_prefix must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
