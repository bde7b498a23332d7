/// 写真対応以前に作られた投稿の photo フィールドに入っているプレースホルダ
pub const LEGACY_PHOTO_SENTINEL: &str = "legacy";

/// 未ログイン呼び出し元の principal
pub const ANONYMOUS_PRINCIPAL: &str = "2vxsx-fae";

/// 受け付ける画像の MIME タイプ（大文字小文字を区別して完全一致）
pub const ACCEPTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// 画像の最大サイズ（この値ちょうどは許容）
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
