//! 検出結果の型定義
//!
//! - DetectionResult: 1枚のナンバープレート（認識文字列と切り出し画像）
//! - DetectionResponse: `/detect` の応答全体
//! - SelectedFile: ユーザーが選択した画像

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 開発用バックエンドの既定URL（デスクトップ・Webで使用）
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// multipartのフィールド名
pub const FILE_FIELD: &str = "file";

/// ベースURL（末尾 `/` は無視）から `/detect` のURLを作る
pub fn detect_endpoint(base_url: &str) -> String {
    format!("{}/detect", base_url.trim().trim_end_matches('/'))
}

/// 検出されたナンバープレート1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// 認識されたプレート文字列
    pub text: String,
    /// 切り出したプレート画像（Base64 JPEG）
    pub plate_image: String,
}

/// `/detect` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResponse {
    /// 検出順のプレート一覧
    pub results: Vec<DetectionResult>,
    /// 注釈付きの全体画像（Base64 JPEG）
    pub result_image: String,
}

impl DetectionResponse {
    pub fn has_plates(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn plate_texts(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.text.as_str()).collect()
    }
}

/// 選択された画像ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// `image/*` 以外のMIMEタイプは受け付けない
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let file_name = file_name.into();
        let mime_type = mime_type.into();

        if !is_image_mime(&mime_type) {
            return Err(Error::InvalidFile(format!("{} ({})", file_name, mime_type)));
        }

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `accept="image/*"` 相当の判定
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.trim().to_ascii_lowercase().starts_with("image/")
}
