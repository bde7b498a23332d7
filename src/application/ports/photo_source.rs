use async_trait::async_trait;

/// 添付候補の画像ファイル
///
/// MIME タイプとサイズは申告値で、検証はこの値だけで行う。
#[async_trait]
pub trait PhotoSource: Send + Sync {
    fn name(&self) -> &str;

    fn content_type(&self) -> &str;

    fn size(&self) -> u64;

    /// 内容をすべて読み込む
    async fn read_all(&self) -> std::io::Result<Vec<u8>>;
}
