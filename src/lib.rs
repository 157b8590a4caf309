//! ナンバープレート検出クライアント
//!
//! 画像を選択してバックエンドの `/detect` へアップロードし、
//! 検出結果（注釈付き画像とプレートごとの文字列）を表示・保存する。

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod export;
pub mod logging;
pub mod scanner;
pub mod session;

pub use client::DetectClient;
pub use error::{PlateDetectError, Result};
