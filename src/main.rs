use anyhow::bail;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use plate_detect::{cache, cli, config, console, error, export, logging, scanner, session};
use plate_detect::DetectClient;
use cli::{Cli, Commands};
use config::{Config, BACKEND_URL_ENV};
use error::PlateDetectError;
use plate_detect_common::{render, Uploader};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    // 壊れた設定でも `config --set-backend-url` で直せるよう、既定値で続行
    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config unreadable, using defaults");
        Config::default()
    });

    match cli.command {
        Commands::Detect { input, backend_url, output, format, recursive, use_cache, no_export } => {
            println!("🔍 plate-detect - ナンバープレート検出\n");

            let backend_url = config.resolve_backend_url(backend_url.as_deref())?;
            let client = DetectClient::new(&backend_url, config.timeout())?;
            let format = match format {
                Some(format) => format,
                None => config.default_format.parse().map_err(PlateDetectError::Config)?,
            };
            println!("バックエンド: {}", client.endpoint());

            let cache_folder = cache::cache_folder_for(&input);
            let mut cache = use_cache.then(|| cache::CacheFile::load(&cache_folder));
            let output_dir = output.unwrap_or_else(|| cache_folder.join("detections"));

            // 1. 画像スキャン（出力先は除外）
            let inputs = scanner::scan_inputs(&input, recursive, Some(&output_dir))?;
            if inputs.is_empty() {
                return Err(PlateDetectError::NoImagesFound(input.display().to_string()).into());
            }
            println!("✔ {}枚の画像を検出\n", inputs.len());

            let progress = (inputs.len() > 1).then(|| {
                let pb = ProgressBar::new(inputs.len() as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                        .unwrap()
                        .progress_chars("#>-"),
                );
                pb
            });
            // 結果はバーの外で stdout へ（端末でなくても出す）
            let say = |line: String| match &progress {
                Some(pb) => pb.suspend(|| println!("{}", line)),
                None => println!("{}", line),
            };

            // 2. 1枚ずつ送信
            let mut failures = 0usize;
            for item in &inputs {
                if let Some(pb) = &progress {
                    pb.set_message(item.relative_name.clone());
                }

                let mut uploader = Uploader::new();
                match scanner::load_selected_file(&item.path) {
                    Ok(file) => uploader.select_file(file),
                    Err(err) => {
                        tracing::warn!(path = %item.path.display(), %err, "file could not be selected");
                        say(format!("✖ {}: {}", item.relative_name, err));
                    }
                }

                session::submit_with_cache(&mut uploader, &client, cache.as_mut()).await;

                for line in console::render_lines(&render(&uploader)) {
                    say(line);
                }

                match uploader.state().response() {
                    Some(response) if !no_export => {
                        match export::export_response(&item.relative_name, response, &format, &output_dir) {
                            Ok(written) => {
                                say(format!("✔ {}件のファイルを出力: {}", written.len(), output_dir.display()));
                            }
                            Err(err) => {
                                tracing::error!(file = %item.relative_name, %err, "export failed");
                                say(format!("✖ {}: {}", item.relative_name, err));
                                failures += 1;
                            }
                        }
                    }
                    Some(_) => {}
                    None => failures += 1,
                }
                say(String::new());

                if let Some(pb) = &progress {
                    pb.inc(1);
                }
            }

            if let Some(pb) = &progress {
                pb.finish_and_clear();
            }

            // 3. キャッシュ保存
            if let Some(cache) = &cache {
                cache.save(&cache_folder)?;
            }

            if failures > 0 {
                bail!("{}/{}枚の画像で検出に失敗しました", failures, inputs.len());
            }
            println!("✅ 検出完了");
        }

        Commands::Preview { input } => {
            let file = scanner::load_selected_file(&input)?;
            let mut uploader = Uploader::new();
            uploader.select_file(file);

            for line in console::render_lines(&render(&uploader)) {
                eprintln!("{}", line);
            }
            if let Some(preview) = uploader.preview() {
                println!("{}", preview);
            }
        }

        Commands::Config { set_backend_url, show } => {
            let mut config = config;

            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  バックエンドURL: {}", config.backend_url.as_deref().unwrap_or("未設定"));
                if let Ok(env_url) = std::env::var(BACKEND_URL_ENV) {
                    println!("  （環境変数 {} で上書き中: {}）", BACKEND_URL_ENV, env_url);
                }
                match config.timeout_seconds {
                    Some(seconds) => println!("  タイムアウト: {}秒", seconds),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  出力形式: {}", config.default_format);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            show_or_clear_cache(&target, clear, info)?;
        }
    }

    Ok(())
}

fn show_or_clear_cache(target: &Path, clear: bool, info: bool) -> anyhow::Result<()> {
    let cache_path = cache::CacheFile::cache_path(target);

    if info || !clear {
        // デフォルトまたは--info: 情報表示
        if cache_path.exists() {
            let cache = cache::CacheFile::load(target);
            println!("キャッシュ情報:");
            println!("  パス: {}", cache_path.display());
            println!("  件数: {}", cache.len());
            if let Ok(meta) = std::fs::metadata(&cache_path) {
                println!("  サイズ: {} bytes", meta.len());
            }
        } else {
            println!("キャッシュファイルが存在しません: {}", cache_path.display());
        }
    }

    if clear {
        if cache::CacheFile::clear(target)? {
            println!("✔ キャッシュを削除しました: {}", cache_path.display());
        } else {
            println!("キャッシュファイルが存在しません");
        }
    }

    Ok(())
}
