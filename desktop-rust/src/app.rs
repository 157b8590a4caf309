use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};

use crate::io::{load_image_file, IMAGE_EXTENSIONS};
use crate::model::{TextureCache, WorkerMessage};
use plate_detect::cli::ExportFormat;
use plate_detect::{export, DetectClient};
use plate_detect_common::view::{ResultsBody, ResultsPanel};
use plate_detect_common::{render, Submission, Uploader};

const PREVIEW_WIDTH: f32 = 360.0;
const PLATE_WIDTH: f32 = 240.0;
const ANNOTATED_WIDTH: f32 = 640.0;

pub struct DesktopApp {
    uploader: Uploader,
    client: DetectClient,
    /// 最後に送信したファイル名（出力ファイル名に使う）
    submitted_name: Option<String>,
    status: String,
    textures: TextureCache,
    worker_tx: Sender<WorkerMessage>,
    worker_rx: Receiver<WorkerMessage>,
}

impl DesktopApp {
    pub fn new(client: DetectClient) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel();
        Self {
            uploader: Uploader::new(),
            client,
            submitted_name: None,
            status: String::new(),
            textures: TextureCache::default(),
            worker_tx,
            worker_rx,
        }
    }

    fn choose_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        // 読めなければ前の選択をそのまま残す
        match load_image_file(&path) {
            Ok(file) => {
                self.status = format!("Selected {}", path.display());
                self.uploader.select_file(file);
                self.textures.clear();
            }
            Err(err) => {
                tracing::warn!("image selection failed: {err:#}");
                self.status = format!("Load failed: {err:#}");
            }
        }
    }

    fn submit(&mut self) {
        match self.uploader.submit() {
            Ok(submission) => {
                self.submitted_name = Some(submission.file.file_name.clone());
                self.status = format!("Sending to {}", self.client.endpoint());
                self.spawn_detect(submission);
            }
            Err(err) => tracing::warn!("submit rejected: {err}"),
        }
    }

    fn spawn_detect(&self, submission: Submission) {
        let client = self.client.clone();
        let sender = self.worker_tx.clone();

        std::thread::spawn(move || {
            let result = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|err| format!("runtime: {err}"))
                .and_then(|runtime| {
                    runtime
                        .block_on(client.detect(&submission.file))
                        .map_err(|err| err.to_string())
                });
            let _ = sender.send(WorkerMessage {
                token: submission.token,
                result,
            });
        });
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.worker_rx.try_recv() {
            let token = msg.token.value();
            if let Err(err) = &msg.result {
                tracing::error!(token, "detection failed: {err}");
            }

            if self.uploader.complete(msg.token, msg.result) {
                self.textures.clear();
                self.status = match self.uploader.state().response() {
                    Some(response) => format!("{} plate(s) detected", response.results.len()),
                    None => String::new(),
                };
            } else {
                tracing::debug!(token, "stale response dropped");
            }
        }
    }

    fn export_results(&mut self) {
        let Some(response) = self.uploader.state().response().cloned() else {
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        let source = self.submitted_name.clone().unwrap_or_default();
        match export::export_response(&source, &response, &ExportFormat::Both, &dir) {
            Ok(written) => self.status = format!("Exported {} files to {}", written.len(), dir.display()),
            Err(err) => {
                tracing::error!("export failed: {err}");
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, panel: &ResultsPanel) {
        ui.separator();
        ui.heading(panel.heading);

        match &panel.body {
            ResultsBody::Plates(blocks) => {
                for block in blocks {
                    ui.group(|ui| {
                        let response = ui.selectable_label(false, RichText::new(&block.caption).strong());
                        response.context_menu(|ui| {
                            if ui.button("Copy Text").clicked() {
                                ui.output_mut(|o| o.copied_text = block.text.clone());
                                ui.close_menu();
                            }
                        });

                        let name = format!("plate_{}", block.index);
                        if let Some(texture) = self.textures.get(ctx, &name, &block.image_src) {
                            ui.add(egui::Image::new(texture).max_width(PLATE_WIDTH));
                        }
                    });
                    ui.add_space(6.0);
                }
            }
            ResultsBody::NoPlates(message) => {
                ui.label(*message);
            }
        }

        if let Some(src) = &panel.annotated_image {
            ui.add_space(8.0);
            if let Some(texture) = self.textures.get(ctx, "annotated", src) {
                ui.add(egui::Image::new(texture).max_width(ANNOTATED_WIDTH));
            }
        }
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    // エラーメッセージが日本語なのでCJKフォントを先頭に
    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("jp_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .insert(0, "jp_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        let loading = self.uploader.state().is_loading();
        if loading {
            ctx.request_repaint();
        }

        let view = render(&self.uploader);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Choose Image...").clicked() {
                        self.choose_image();
                        ui.close_menu();
                    }
                    let has_results = self.uploader.state().response().is_some();
                    if ui.add_enabled(has_results, egui::Button::new("Export Results...")).clicked() {
                        self.export_results();
                        ui.close_menu();
                    }
                });

                ui.separator();
                ui.label(RichText::new(self.client.endpoint().as_str()).color(Color32::from_gray(130)));
                if !self.status.is_empty() {
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.heading(view.title);
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button(view.chooser_label).clicked() {
                        self.choose_image();
                    }
                    ui.label(view.file_name.as_deref().unwrap_or("-"));
                });

                if let Some(src) = &view.preview {
                    if let Some(texture) = self.textures.get(ctx, "preview", src) {
                        ui.add(egui::Image::new(texture).max_width(PREVIEW_WIDTH));
                    }
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(view.submit.enabled, egui::Button::new(view.submit.label))
                        .clicked()
                    {
                        self.submit();
                    }
                    if loading {
                        ui.spinner();
                    }
                });

                if let Some(error) = &view.error {
                    ui.label(RichText::new(error).color(Color32::from_rgb(220, 80, 80)));
                }

                if let Some(panel) = &view.results {
                    self.render_results(ui, ctx, panel);
                }
            });
        });
    }
}
