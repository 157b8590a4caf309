use crate::error::{PlateDetectError, Result};
use plate_detect_common::SelectedFile;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInput {
    pub path: PathBuf,
    pub file_name: String,
    /// 入力ルートからの相対パス（区切りは `/`）。出力ファイル名の元になる
    pub relative_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "gif"];

/// 入力パスから送信対象を列挙
///
/// ファイルならそれ自体、フォルダなら画像拡張子のファイルを相対パス順で返す。
/// `exclude` のフォルダ（出力先など）は中に入らない。
pub fn scan_inputs(path: &Path, recursive: bool, exclude: Option<&Path>) -> Result<Vec<ImageInput>> {
    if !path.exists() {
        return Err(PlateDetectError::FolderNotFound(path.display().to_string()));
    }

    if path.is_file() {
        let file_name = file_name_of(path);
        return Ok(vec![ImageInput {
            path: path.to_path_buf(),
            relative_name: file_name.clone(),
            file_name,
        }]);
    }

    // まだ存在しない出力先は除外不要
    let excluded = exclude.and_then(|p| p.canonicalize().ok());

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images: Vec<ImageInput> = WalkDir::new(path)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| !is_excluded(e.path(), e.file_type().is_dir(), excluded.as_deref()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| is_image_extension(&ext.to_string_lossy())))
        .map(|e| ImageInput {
            path: e.path().to_path_buf(),
            file_name: file_name_of(e.path()),
            relative_name: relative_name_of(path, e.path()),
        })
        .collect();

    images.sort_by(|a, b| a.relative_name.cmp(&b.relative_name));

    Ok(images)
}

fn is_excluded(entry: &Path, is_dir: bool, excluded: Option<&Path>) -> bool {
    match excluded {
        Some(excluded) if is_dir => entry.canonicalize().is_ok_and(|p| p == excluded),
        _ => false,
    }
}

fn relative_name_of(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// ファイルを読み込み、中身から画像形式を判定して SelectedFile にする
pub fn load_selected_file(path: &Path) -> Result<SelectedFile> {
    if !path.is_file() {
        return Err(PlateDetectError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let file_name = file_name_of(path);
    let mime_type = sniff_mime(&bytes)
        .ok_or_else(|| PlateDetectError::NotAnImage(path.display().to_string()))?;

    Ok(SelectedFile::new(file_name, mime_type, bytes)?)
}

/// マジックバイトから画像のMIMEタイプを判定
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}

fn is_image_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&lower.as_str())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("png"));
        assert!(is_image_extension("WebP"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("pdf"));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(JPEG_MAGIC), Some("image/jpeg"));
        assert_eq!(sniff_mime(PNG_MAGIC), Some("image/png"));
        assert_eq!(sniff_mime(b"plain text"), None);
    }

    #[test]
    fn test_scan_inputs_not_found() {
        let result = scan_inputs(Path::new("/nonexistent/folder"), false, None);
        assert!(matches!(result, Err(PlateDetectError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_inputs_single_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("car.jpg");
        fs::write(&path, JPEG_MAGIC).unwrap();

        let result = scan_inputs(&path, false, None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file_name, "car.jpg");
    }

    #[test]
    fn test_scan_inputs_folder_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("c.jpg"), JPEG_MAGIC).unwrap();
        fs::write(dir.path().join("a.PNG"), PNG_MAGIC).unwrap();
        fs::write(dir.path().join("b.jpeg"), JPEG_MAGIC).unwrap();
        fs::write(dir.path().join("readme.txt"), "text").unwrap();

        let result = scan_inputs(dir.path(), false, None).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpeg", "c.jpg"]);
    }

    #[test]
    fn test_scan_inputs_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("top.jpg"), JPEG_MAGIC).unwrap();
        fs::write(dir.path().join("sub").join("nested.jpg"), JPEG_MAGIC).unwrap();

        assert_eq!(scan_inputs(dir.path(), false, None).unwrap().len(), 1);

        let nested = scan_inputs(dir.path(), true, None).unwrap();
        let names: Vec<&str> = nested.iter().map(|i| i.relative_name.as_str()).collect();
        assert_eq!(names, vec!["sub/nested.jpg", "top.jpg"]);
        assert_eq!(nested[0].file_name, "nested.jpg");
    }

    #[test]
    fn test_scan_inputs_skips_output_folder() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("detections");
        fs::create_dir_all(&output).unwrap();
        fs::write(dir.path().join("car.jpg"), JPEG_MAGIC).unwrap();
        fs::write(output.join("car_annotated.jpg"), JPEG_MAGIC).unwrap();
        fs::write(output.join("car_plate_1.jpg"), JPEG_MAGIC).unwrap();

        let result = scan_inputs(dir.path(), true, Some(&output)).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.relative_name.as_str()).collect();
        assert_eq!(names, vec!["car.jpg"]);

        // 除外先が未作成でも問題ない
        let result = scan_inputs(dir.path(), true, Some(&dir.path().join("missing"))).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_scan_inputs_same_name_in_subfolders() {
        let dir = tempdir().unwrap();
        for sub in ["x", "y"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("car.jpg"), JPEG_MAGIC).unwrap();
        }

        let result = scan_inputs(dir.path(), true, None).unwrap();
        let names: Vec<&str> = result.iter().map(|i| i.relative_name.as_str()).collect();
        assert_eq!(names, vec!["x/car.jpg", "y/car.jpg"]);
    }

    #[test]
    fn test_load_selected_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("car.jpg");
        fs::write(&path, JPEG_MAGIC).unwrap();

        let file = load_selected_file(&path).unwrap();
        assert_eq!(file.file_name, "car.jpg");
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.bytes, JPEG_MAGIC);
    }

    #[test]
    fn test_load_selected_file_uses_content_not_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mislabeled.jpg");
        fs::write(&path, PNG_MAGIC).unwrap();

        let file = load_selected_file(&path).unwrap();
        assert_eq!(file.mime_type, "image/png");
    }

    #[test]
    fn test_load_selected_file_not_an_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        fs::write(&path, "not really a jpeg").unwrap();

        let result = load_selected_file(&path);
        assert!(matches!(result, Err(PlateDetectError::NotAnImage(_))));
    }

    #[test]
    fn test_load_selected_file_missing() {
        let result = load_selected_file(Path::new("/nonexistent/car.jpg"));
        assert!(matches!(result, Err(PlateDetectError::FileNotFound(_))));
    }
}
