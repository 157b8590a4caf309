pub mod images;
pub mod report;

use crate::cli::ExportFormat;
use crate::error::Result;
use plate_detect_common::DetectionResponse;
use std::path::{Component, Path, PathBuf};

/// 出力ファイル名の元になる語幹（拡張子なし）
///
/// サブフォルダ付きの相対名は `_` でつなぐ（`x/car.jpg` → `x_car`）。
pub fn file_stem(source_name: &str) -> String {
    let path = Path::new(source_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");

    let mut parts: Vec<String> = path
        .parent()
        .into_iter()
        .flat_map(|parent| parent.components())
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    parts.push(stem.to_string());
    parts.join("_")
}

/// 検出結果を指定形式で出力し、書き出したファイルを返す
pub fn export_response(
    source_name: &str,
    response: &DetectionResponse,
    format: &ExportFormat,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let stem = file_stem(source_name);

    let mut written = Vec::new();
    if matches!(format, ExportFormat::Images | ExportFormat::Both) {
        written.extend(images::write_images(&stem, response, output_dir)?);
    }
    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        written.push(report::write_report(&stem, source_name, response, output_dir)?);
    }

    tracing::debug!(source = source_name, files = written.len(), "export finished");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("car.jpg"), "car");
        assert_eq!(file_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(file_stem("noext"), "noext");
        assert_eq!(file_stem(""), "image");
    }

    #[test]
    fn test_file_stem_keeps_subfolders_apart() {
        assert_eq!(file_stem("x/car.jpg"), "x_car");
        assert_eq!(file_stem("y/car.jpg"), "y_car");
        assert_eq!(file_stem("a/b/car.png"), "a_b_car");
        assert_ne!(file_stem("x/car.jpg"), file_stem("y/car.jpg"));
    }
}
