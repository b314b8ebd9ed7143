//! プレビュー用Data URL生成

use crate::error::PreviewError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt::Display;
use std::future::Future;

/// バイト列をData URLに変換
pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// 読み込み処理を1回待ってプレビューを作る
///
/// 読み込み失敗の原因はログにだけ残し、呼び出し側には `ReadFailed` を返す。
/// 成功時は読み込んだバイト列も返すので、抽出で再利用できる。
pub async fn build_preview<F, E>(media_type: &str, read: F) -> Result<(String, Vec<u8>), PreviewError>
where
    F: Future<Output = Result<Vec<u8>, E>>,
    E: Display,
{
    match read.await {
        Ok(bytes) => Ok((data_url(media_type, &bytes), bytes)),
        Err(e) => {
            tracing::warn!("preview read failed: {}", e);
            Err(PreviewError::ReadFailed)
        }
    }
}
