//! View をターミナル向けのテキストにする

use plate_detect_common::view::{ResultsBody, View};
use plate_detect_common::DataUri;

pub fn render_lines(view: &View) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", view.title)];

    match &view.file_name {
        Some(name) => lines.push(format!("[{}] {}", view.chooser_label, name)),
        None => lines.push(format!("[{}] -", view.chooser_label)),
    }

    if let Some(preview) = &view.preview {
        lines.push(format!("Preview: {}", describe_image(preview)));
    }

    lines.push(format!(
        "[{}]{}",
        view.submit.label,
        if view.submit.enabled { "" } else { " (disabled)" }
    ));

    if let Some(error) = &view.error {
        lines.push(format!("Error: {}", error));
    }

    if let Some(panel) = &view.results {
        lines.push(format!("-- {} --", panel.heading));
        match &panel.body {
            ResultsBody::Plates(blocks) => {
                for block in blocks {
                    lines.push(format!(
                        "#{} {} ({})",
                        block.index + 1,
                        block.caption,
                        describe_image(&block.image_src)
                    ));
                }
            }
            ResultsBody::NoPlates(message) => lines.push(message.to_string()),
        }
        if let Some(annotated) = &panel.annotated_image {
            lines.push(format!("Annotated image: {}", describe_image(annotated)));
        }
    }

    lines
}

/// 画像ソースは中身を出さず、形式とサイズだけ示す
fn describe_image(src: &str) -> String {
    match DataUri::parse(src) {
        Ok(uri) => match uri.decode_bytes() {
            Ok(bytes) => format!("{}, {}", uri.mime_type, format_size(bytes.len())),
            Err(_) => format!("{}, undecodable", uri.mime_type),
        },
        Err(_) => "unknown image".to_string(),
    }
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_detect_common::{
        render, DetectionResponse, DetectionResult, SelectedFile, Uploader,
    };

    fn succeeded(results: Vec<DetectionResult>) -> Uploader {
        let mut uploader = Uploader::new();
        uploader.select_file(SelectedFile::new("car.jpg", "image/jpeg", vec![0u8; 2048]).unwrap());
        let submission = uploader.submit().unwrap();
        uploader.complete::<String>(
            submission.token,
            Ok(DetectionResponse { results, result_image: "AAAA".to_string() }),
        );
        uploader
    }

    #[test]
    fn test_render_lines_idle() {
        let lines = render_lines(&render(&Uploader::new()));
        assert_eq!(
            lines,
            vec![
                "== License Plate Detector ==".to_string(),
                "[Choose Image] -".to_string(),
                "[Detect License Plate]".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_lines_with_plate() {
        let uploader = succeeded(vec![DetectionResult {
            text: "ABC123".to_string(),
            plate_image: "AAAA".to_string(),
        }]);

        let lines = render_lines(&render(&uploader));
        assert!(lines.contains(&"[Choose Image] car.jpg".to_string()));
        assert!(lines.contains(&"Preview: image/jpeg, 2.0 KB".to_string()));
        assert!(lines.contains(&"-- Detection Results --".to_string()));
        assert!(lines.contains(&"#1 Plate Text: ABC123 (image/jpeg, 3 bytes)".to_string()));
        assert!(lines.contains(&"Annotated image: image/jpeg, 3 bytes".to_string()));
    }

    #[test]
    fn test_render_lines_no_plates() {
        let lines = render_lines(&render(&succeeded(vec![])));
        assert!(lines.contains(&"No license plates detected".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with('#')));
    }

    #[test]
    fn test_render_lines_loading() {
        let mut uploader = Uploader::new();
        uploader.select_file(SelectedFile::new("car.jpg", "image/jpeg", vec![1, 2, 3]).unwrap());
        uploader.submit().unwrap();

        let lines = render_lines(&render(&uploader));
        assert!(lines.contains(&"[Processing...] (disabled)".to_string()));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(10), "10 bytes");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
