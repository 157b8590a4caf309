use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plate-detect")]
#[command(about = "ナンバープレート検出クライアント（画像アップロード・結果表示）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像（またはフォルダ内の画像）をバックエンドへ送って検出
    Detect {
        /// 画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        input: PathBuf,

        /// バックエンドのベースURL（設定・環境変数より優先）
        #[arg(long)]
        backend_url: Option<String>,

        /// 出力ディレクトリ（デフォルト: 入力フォルダ/detections）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (images/json/both)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// キャッシュを使用（同じ画像の再送信をスキップ）
        #[arg(long)]
        use_cache: bool,

        /// 結果を画面表示のみにしてファイル出力しない
        #[arg(long)]
        no_export: bool,
    },

    /// 画像を選択してプレビュー（Data URI）を表示
    Preview {
        /// 画像ファイルのパス
        #[arg(required = true)]
        input: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Images,
    Json,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "images" | "image" | "jpg" => Ok(ExportFormat::Images),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use images, json, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Images => write!(f, "images"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
