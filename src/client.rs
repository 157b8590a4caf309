//! 検出バックエンドのHTTPクライアント
//!
//! `POST {backend}/detect` に multipart/form-data（フィールド `file`）で画像を送り、
//! 応答本文をスキーマ検証してから返す。リトライはしない。

use crate::error::{PlateDetectError, Result};
use plate_detect_common::{decode_response, detect_endpoint, DetectionResponse, SelectedFile};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;

pub use plate_detect_common::FILE_FIELD;

/// エラー時にログへ残す本文の最大文字数
const MAX_ERROR_BODY_CHARS: usize = 512;

/// ベースURLから `/detect` のURLを組み立てる
pub fn endpoint_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(&detect_endpoint(base_url))
        .map_err(|e| PlateDetectError::InvalidBackendUrl(format!("{}: {}", base_url, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PlateDetectError::InvalidBackendUrl(format!(
            "{}: http/https のみ対応",
            base_url
        )));
    }

    Ok(url)
}

#[derive(Debug, Clone)]
pub struct DetectClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl DetectClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = endpoint_url(base_url)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("plate-detect/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// 画像を1回だけ送信して結果を受け取る
    pub async fn detect(&self, file: &SelectedFile) -> Result<DetectionResponse> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!(
            endpoint = %self.endpoint,
            file = %file.file_name,
            bytes = file.len(),
            "uploading image"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PlateDetectError::Backend {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let decoded = decode_response(&body)?;
        tracing::debug!(plates = decoded.results.len(), "detection response decoded");
        Ok(decoded)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let url = endpoint_url("http://localhost:5000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/detect");
    }

    #[test]
    fn test_endpoint_url_trailing_slash() {
        let url = endpoint_url("http://localhost:5000/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/detect");

        let url = endpoint_url("https://example.com/api/").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/detect");
    }

    #[test]
    fn test_endpoint_url_invalid() {
        assert!(matches!(
            endpoint_url("not a url"),
            Err(PlateDetectError::InvalidBackendUrl(_))
        ));
        assert!(matches!(
            endpoint_url("ftp://example.com"),
            Err(PlateDetectError::InvalidBackendUrl(_))
        ));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("あいうえお", 2), "あい...");
    }
}
