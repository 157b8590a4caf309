//! Data URIユーティリティ
//!
//! プレビュー表示と、レスポンス中のBase64 JPEGを画像ソースにする処理

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};
use crate::types::SelectedFile;

/// バックエンドが返す画像のMIMEタイプ
pub const JPEG_MIME: &str = "image/jpeg";

/// バイト列からData URIを生成
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// 選択ファイルのプレビュー
pub fn preview(file: &SelectedFile) -> String {
    encode(&file.mime_type, &file.bytes)
}

/// Base64 JPEGを `<img src>` 用のData URIにする
pub fn jpeg_src(base64_payload: &str) -> String {
    format!("data:{};base64,{}", JPEG_MIME, base64_payload)
}

/// 標準Base64として妥当か
pub fn is_base64(payload: &str) -> bool {
    STANDARD.decode(payload).is_ok()
}

/// Base64ペイロードをデコード
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload)
        .map_err(|e| Error::DataUri(format!("invalid base64: {}", e)))
}

/// 解析済みのData URI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    pub mime_type: &'a str,
    pub payload: &'a str,
}

impl<'a> DataUri<'a> {
    /// "data:image/jpeg;base64,/9j/4AAQ..." 形式のみ対応
    pub fn parse(uri: &'a str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::DataUri("missing `data:` scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::DataUri("missing `,` separator".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::DataUri("only base64 data URIs are supported".into()))?;

        Ok(Self { mime_type, payload })
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        decode_base64(self.payload)
    }
}
