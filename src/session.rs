//! 送信処理
//!
//! Uploader の送信開始 → HTTP送信 → 結果反映までを1回分行う。
//! エラーはここでログに出して状態へ変換し、呼び出し元へは伝播させない。

use crate::cache::{compute_hash, CacheFile};
use crate::client::DetectClient;
use crate::error::PlateDetectError;
use plate_detect_common::{DetectionResponse, Uploader};

/// 1回の送信で何が起きたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// ファイル未選択で送信しなかった
    Rejected,
    /// バックエンドへ送信した（成否は Uploader の状態を見る）
    Requested,
    /// キャッシュから結果を得た
    CacheHit,
}

pub async fn submit(uploader: &mut Uploader, client: &DetectClient) -> SubmitOutcome {
    submit_with_cache(uploader, client, None).await
}

pub async fn submit_with_cache(
    uploader: &mut Uploader,
    client: &DetectClient,
    mut cache: Option<&mut CacheFile>,
) -> SubmitOutcome {
    let submission = match uploader.submit() {
        Ok(submission) => submission,
        Err(err) => {
            tracing::warn!(%err, "submission rejected");
            return SubmitOutcome::Rejected;
        }
    };

    let hash = cache.as_ref().map(|_| compute_hash(&submission.file.bytes));

    if let (Some(cache), Some(hash)) = (cache.as_deref(), hash.as_deref()) {
        if let Some(response) = cache.get(hash) {
            tracing::debug!(file = %submission.file.file_name, "cache hit");
            uploader.complete::<PlateDetectError>(submission.token, Ok(response.clone()));
            return SubmitOutcome::CacheHit;
        }
    }

    let result: Result<DetectionResponse, PlateDetectError> = client.detect(&submission.file).await;

    match &result {
        Ok(response) => {
            if let (Some(cache), Some(hash)) = (cache.as_deref_mut(), hash) {
                cache.insert(
                    hash,
                    submission.file.file_name.clone(),
                    submission.file.len() as u64,
                    response.clone(),
                );
            }
        }
        Err(err) => {
            tracing::error!(file = %submission.file.file_name, error = %err, "detection request failed");
        }
    }

    if !uploader.complete(submission.token, result) {
        tracing::debug!(token = submission.token.value(), "stale response discarded");
    }

    SubmitOutcome::Requested
}
