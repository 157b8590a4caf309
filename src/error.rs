use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlateDetectError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("バックエンドURLが設定されていません。`plate-detect config --set-backend-url URL` か環境変数 PLATE_DETECT_BACKEND_URL で設定してください")]
    MissingBackendUrl,

    #[error("バックエンドURLが不正: {0}")]
    InvalidBackendUrl(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像ファイルではありません: {0}")]
    NotAnImage(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("バックエンドエラー (HTTP {status}): {body}")]
    Backend { status: u16, body: String },

    #[error("レスポンス検証エラー: {0}")]
    Decode(#[from] plate_detect_common::DecodeError),

    #[error("出力エラー: {0}")]
    Export(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] plate_detect_common::Error),
}

pub type Result<T> = std::result::Result<T, PlateDetectError>;
