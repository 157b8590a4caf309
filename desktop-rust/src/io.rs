use anyhow::{Context, Result};
use eframe::egui;
use std::path::Path;

use plate_detect::scanner;
use plate_detect_common::{DataUri, SelectedFile};

/// ファイルダイアログの拡張子フィルタ
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "gif"];

/// 表示用の最大辺
const MAX_TEXTURE_SIDE: u32 = 1024;

pub fn load_image_file(path: &Path) -> Result<SelectedFile> {
    scanner::load_selected_file(path).with_context(|| format!("read {}", path.display()))
}

pub fn decode_data_uri(src: &str) -> Result<egui::ColorImage> {
    let uri = DataUri::parse(src)?;
    let bytes = uri.decode_bytes()?;
    let image = image::load_from_memory(&bytes)
        .with_context(|| format!("decode {}", uri.mime_type))?;
    let image = if image.width() > MAX_TEXTURE_SIDE || image.height() > MAX_TEXTURE_SIDE {
        image.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE)
    } else {
        image
    };

    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &image.to_rgba8().into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use plate_detect_common::data_uri;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_data_uri() {
        let src = data_uri::encode("image/png", &png_bytes(4, 3));
        let image = decode_data_uri(&src).unwrap();
        assert_eq!(image.size, [4, 3]);
    }

    #[test]
    fn test_decode_data_uri_large_image_is_shrunk() {
        let src = data_uri::encode("image/png", &png_bytes(2048, 512));
        let image = decode_data_uri(&src).unwrap();
        assert_eq!(image.size, [1024, 256]);
    }

    #[test]
    fn test_decode_data_uri_rejects_garbage() {
        assert!(decode_data_uri("not a data uri").is_err());
        assert!(decode_data_uri(&data_uri::jpeg_src("AAAA")).is_err());
    }

    #[test]
    fn test_load_image_file() {
        let dir = std::env::temp_dir().join(format!("plate-detect-desktop-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("car.png");
        std::fs::write(&path, png_bytes(2, 2)).unwrap();

        let file = load_image_file(&path).unwrap();
        assert_eq!(file.file_name, "car.png");
        assert_eq!(file.mime_type, "image/png");

        let missing = load_image_file(&dir.join("missing.png")).unwrap_err();
        assert!(format!("{missing:#}").contains("missing.png"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
