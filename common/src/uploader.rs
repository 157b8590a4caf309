//! アップローダーの状態管理
//!
//! 選択ファイル・プレビュー・リクエスト状態を1か所で持つ。
//! ネットワーク呼び出しはホスト側（CLI/デスクトップ/Web）が行い、
//! 結果を `complete` で戻す。
//!
//! 状態遷移:
//! - submit: Idle/Failed/Succeeded -> Loading（ファイル未選択なら Failed）
//! - complete(Ok): Loading -> Succeeded
//! - complete(Err): Loading -> Failed
//!
//! 各送信には単調増加するトークンが付き、最新でない応答は捨てる。

use thiserror::Error;

use crate::data_uri;
use crate::types::{DetectionResponse, SelectedFile};

/// ファイル未選択で送信したときのメッセージ
pub const NO_FILE_MESSAGE: &str = "Please select an image";

/// 通信・バックエンドエラー時のメッセージ
pub const FAILURE_MESSAGE: &str = "Failed to process image. Please try again.";

/// リクエスト状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(DetectionResponse),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn response(&self) -> Option<&DetectionResponse> {
        match self {
            RequestState::Succeeded(response) => Some(response),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// 送信ごとのトークン
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// 送信開始時にホストへ渡す内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub token: RequestToken,
    pub file: SelectedFile,
}

/// 送信前の検証エラー
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select an image")]
    NoFileSelected,
}

/// アップローダー本体
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uploader {
    selected: Option<SelectedFile>,
    preview: Option<String>,
    state: RequestState,
    latest_token: u64,
}

impl Uploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// ファイルを選択し、同時にプレビューを作り直す
    pub fn select_file(&mut self, file: SelectedFile) {
        self.preview = Some(data_uri::preview(&file));
        self.selected = Some(file);
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// 送信ボタンの有効/無効
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }

    /// 送信を開始
    ///
    /// ファイル未選択なら Failed にしてエラーを返す（通信は発生しない）。
    /// Loading 中の再送信は止めず、前のトークンを無効にする。
    pub fn submit(&mut self) -> Result<Submission, ValidationError> {
        let Some(file) = self.selected.clone() else {
            self.state = RequestState::Failed(NO_FILE_MESSAGE.to_string());
            return Err(ValidationError::NoFileSelected);
        };

        self.latest_token += 1;
        self.state = RequestState::Loading;

        Ok(Submission {
            token: RequestToken(self.latest_token),
            file,
        })
    }

    /// 送信結果を反映
    ///
    /// エラーの詳細は捨てて汎用メッセージにする（ログはホスト側）。
    ///
    /// # Returns
    /// 反映したら true、古いトークンなどで無視したら false
    pub fn complete<E>(&mut self, token: RequestToken, outcome: Result<DetectionResponse, E>) -> bool {
        if !self.is_current(token) || !self.state.is_loading() {
            return false;
        }

        self.state = match outcome {
            Ok(response) => RequestState::Succeeded(response),
            Err(_) => RequestState::Failed(FAILURE_MESSAGE.to_string()),
        };
        true
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DetectionResult;

    fn car_jpg() -> SelectedFile {
        SelectedFile::new("car.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap()
    }

    fn one_plate() -> DetectionResponse {
        DetectionResponse {
            results: vec![DetectionResult {
                text: "ABC123".to_string(),
                plate_image: "AAAA".to_string(),
            }],
            result_image: "AAAA".to_string(),
        }
    }

    #[test]
    fn test_initial_state() {
        let uploader = Uploader::new();
        assert_eq!(uploader.state(), &RequestState::Idle);
        assert!(uploader.selected_file().is_none());
        assert!(uploader.preview().is_none());
        assert!(uploader.can_submit());
    }

    #[test]
    fn test_select_file_builds_preview() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());

        assert_eq!(uploader.selected_file().unwrap().file_name, "car.jpg");
        assert_eq!(uploader.preview(), Some("data:image/jpeg;base64,/9j/4A=="));
    }

    #[test]
    fn test_preview_follows_latest_selection() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());
        uploader.select_file(SelectedFile::new("b.png", "image/png", b"abc".to_vec()).unwrap());

        assert_eq!(uploader.selected_file().unwrap().file_name, "b.png");
        assert_eq!(uploader.preview(), Some("data:image/png;base64,YWJj"));
    }

    #[test]
    fn test_submit_without_file() {
        let mut uploader = Uploader::new();
        let result = uploader.submit();

        assert_eq!(result, Err(ValidationError::NoFileSelected));
        assert_eq!(uploader.state().error_message(), Some(NO_FILE_MESSAGE));
    }

    #[test]
    fn test_submit_sets_loading() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());

        let submission = uploader.submit().unwrap();
        assert_eq!(submission.file.file_name, "car.jpg");
        assert!(uploader.state().is_loading());
        assert!(!uploader.can_submit());
    }

    #[test]
    fn test_complete_success() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());
        let submission = uploader.submit().unwrap();

        assert!(uploader.complete::<String>(submission.token, Ok(one_plate())));
        assert_eq!(uploader.state().response(), Some(&one_plate()));
        assert!(uploader.can_submit());
    }

    #[test]
    fn test_complete_failure_uses_generic_message() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());
        let submission = uploader.submit().unwrap();

        assert!(uploader.complete(submission.token, Err("connection refused")));
        assert_eq!(uploader.state().error_message(), Some(FAILURE_MESSAGE));
        assert!(!uploader.state().is_loading());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());
        let first = uploader.submit().unwrap();
        let second = uploader.submit().unwrap();
        assert!(second.token > first.token);

        // 古い応答は無視され Loading のまま
        assert!(!uploader.complete::<String>(first.token, Ok(one_plate())));
        assert!(uploader.state().is_loading());

        assert!(uploader.complete(second.token, Err("timeout")));
        assert_eq!(uploader.state().error_message(), Some(FAILURE_MESSAGE));
    }

    #[test]
    fn test_complete_twice_is_ignored() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());
        let submission = uploader.submit().unwrap();

        assert!(uploader.complete::<String>(submission.token, Ok(one_plate())));
        assert!(!uploader.complete(submission.token, Err("late error")));
        assert!(uploader.state().response().is_some());
    }

    #[test]
    fn test_resubmit_after_failure() {
        let mut uploader = Uploader::new();
        uploader.select_file(car_jpg());
        let first = uploader.submit().unwrap();
        uploader.complete(first.token, Err("boom"));

        let second = uploader.submit().unwrap();
        assert!(uploader.state().is_loading());
        assert!(uploader.complete::<String>(second.token, Ok(one_plate())));
        assert_eq!(uploader.state().response(), Some(&one_plate()));
    }
}
