use crate::domain::value_objects::{PostId, PostPhoto, Principal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ナノ秒単位の Unix 時刻（リモートサービスの Time 型）
pub type Time = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: Principal,
    pub timestamp: Time,
    pub photo: PostPhoto,
}

impl Post {
    pub fn new(
        id: PostId,
        title: String,
        body: String,
        author: Principal,
        timestamp: Time,
        photo: PostPhoto,
    ) -> Self {
        Self {
            id,
            title,
            body,
            author,
            timestamp,
            photo,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.timestamp)
    }

    pub fn is_authored_by(&self, principal: &Principal) -> bool {
        &self.author == principal
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_displayable()
    }

    /// 本文の先頭 `max_chars` 文字。超える場合は `...` を付ける。
    pub fn body_preview(&self, max_chars: usize) -> String {
        if self.body.chars().count() <= max_chars {
            return self.body.clone();
        }
        let head: String = self.body.chars().take(max_chars).collect();
        format!("{head}...")
    }

    /// タイトル・本文・写真を置き換える。作成者と作成時刻は変わらない。
    pub fn apply_update(&mut self, title: String, body: String, photo: PostPhoto) {
        self.title = title;
        self.body = body;
        self.photo = photo;
    }
}
