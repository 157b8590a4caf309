use crate::error::{PlateDetectError, Result};
use plate_detect_common::data_uri::decode_base64;
use plate_detect_common::DetectionResponse;
use std::path::{Path, PathBuf};

pub fn annotated_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{}_annotated.jpg", stem))
}

/// プレート番号は1始まり
pub fn plate_path(output_dir: &Path, stem: &str, number: usize) -> PathBuf {
    output_dir.join(format!("{}_plate_{}.jpg", stem, number))
}

/// 注釈付き画像と切り出しプレート画像をJPEGで保存
pub fn write_images(stem: &str, response: &DetectionResponse, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if !response.result_image.is_empty() {
        let path = annotated_path(output_dir, stem);
        write_base64(&path, &response.result_image)?;
        written.push(path);
    }

    for (index, plate) in response.results.iter().enumerate() {
        let path = plate_path(output_dir, stem, index + 1);
        write_base64(&path, &plate.plate_image)?;
        written.push(path);
    }

    Ok(written)
}

fn write_base64(path: &Path, payload: &str) -> Result<()> {
    let bytes = decode_base64(payload)
        .map_err(|e| PlateDetectError::Export(format!("{}: {}", path.display(), e)))?;
    std::fs::write(path, bytes)?;
    Ok(())
}
