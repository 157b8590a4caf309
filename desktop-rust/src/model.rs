use std::collections::HashMap;

use eframe::egui;
use plate_detect_common::{DetectionResponse, RequestToken};

use crate::io::decode_data_uri;

/// ワーカースレッドからの結果
pub struct WorkerMessage {
    pub token: RequestToken,
    pub result: Result<DetectionResponse, String>,
}

/// Data URI → テクスチャ
///
/// 画像ソース文字列をキーにする。選択や結果が変わったら `clear` する。
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl TextureCache {
    pub fn get(&mut self, ctx: &egui::Context, name: &str, src: &str) -> Option<&egui::TextureHandle> {
        self.textures
            .entry(src.to_string())
            .or_insert_with(|| match decode_data_uri(src) {
                Ok(image) => Some(ctx.load_texture(name, image, egui::TextureOptions::default())),
                Err(err) => {
                    tracing::warn!(texture = name, "image decode failed: {err:#}");
                    None
                }
            })
            .as_ref()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}
