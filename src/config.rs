use crate::error::{PlateDetectError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// バックエンドURLを上書きする環境変数
pub const BACKEND_URL_ENV: &str = "PLATE_DETECT_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub backend_url: Option<String>,
    /// 未設定ならタイムアウトなし
    pub timeout_seconds: Option<u64>,
    pub default_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            timeout_seconds: None,
            default_format: "both".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PlateDetectError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("plate-detect").join("config.json"))
    }

    /// 優先順位: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_backend_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env_value = std::env::var(BACKEND_URL_ENV).ok();
        pick_backend_url(cli_override, env_value.as_deref(), self.backend_url.as_deref())
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        crate::client::endpoint_url(&url)?;
        self.backend_url = Some(url);
        self.save()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

fn pick_backend_url(
    cli_override: Option<&str>,
    env_value: Option<&str>,
    file_value: Option<&str>,
) -> Result<String> {
    [cli_override, env_value, file_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or(PlateDetectError::MissingBackendUrl)
}
