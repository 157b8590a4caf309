//! Plate Detect Common Library
//!
//! CLI・デスクトップ・Web(WASM)で共有される型と状態管理
//!
//! - types: バックエンドのレスポンス型と選択ファイル
//! - decoder: `/detect` レスポンスのスキーマ検証付きデコーダ
//! - data_uri: プレビュー用Data URIの生成と解析
//! - uploader: 選択・送信・結果の状態機械
//! - view: 状態から描画内容を導く純粋関数

pub mod types;
pub mod error;
pub mod decoder;
pub mod data_uri;
pub mod uploader;
pub mod view;

pub use types::{DetectionResponse, DetectionResult, SelectedFile, is_image_mime, detect_endpoint, DEFAULT_BACKEND_URL, FILE_FIELD};
pub use error::{Error, Result};
pub use decoder::{decode_response, DecodeError};
pub use data_uri::DataUri;
pub use uploader::{
    RequestState, RequestToken, Submission, Uploader, ValidationError,
    FAILURE_MESSAGE, NO_FILE_MESSAGE,
};
pub use view::{render, PlateBlock, ResultsBody, ResultsPanel, SubmitButton, View};
