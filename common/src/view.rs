//! 描画内容の導出
//!
//! `render` は Uploader の状態だけから View を作る純粋関数。
//! コンソール・egui・Leptos はこの View を描くだけで、状態を再解釈しない。

use crate::data_uri::jpeg_src;
use crate::types::DetectionResponse;
use crate::uploader::Uploader;

pub const TITLE: &str = "License Plate Detector";
pub const CHOOSE_LABEL: &str = "Choose Image";
pub const SUBMIT_LABEL: &str = "Detect License Plate";
pub const BUSY_LABEL: &str = "Processing...";
pub const RESULTS_HEADING: &str = "Detection Results";
pub const NO_PLATES_MESSAGE: &str = "No license plates detected";
pub const PLATE_TEXT_PREFIX: &str = "Plate Text: ";
/// ファイル選択の accept 属性
pub const IMAGE_ACCEPT: &str = "image/*";

/// 画面全体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub title: &'static str,
    pub chooser_label: &'static str,
    pub file_name: Option<String>,
    pub preview: Option<String>,
    pub submit: SubmitButton,
    pub error: Option<String>,
    pub results: Option<ResultsPanel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// 結果パネル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsPanel {
    pub heading: &'static str,
    pub body: ResultsBody,
    /// 注釈付き全体画像（Data URI）。空文字のときは None
    pub annotated_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsBody {
    Plates(Vec<PlateBlock>),
    NoPlates(&'static str),
}

impl ResultsBody {
    pub fn plates(&self) -> &[PlateBlock] {
        match self {
            ResultsBody::Plates(blocks) => blocks,
            ResultsBody::NoPlates(_) => &[],
        }
    }
}

/// プレート1件の表示ブロック
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateBlock {
    pub index: usize,
    pub caption: String,
    pub text: String,
    pub image_src: String,
}

impl ResultsPanel {
    pub fn from_response(response: &DetectionResponse) -> Self {
        let body = if response.has_plates() {
            ResultsBody::Plates(
                response
                    .results
                    .iter()
                    .enumerate()
                    .map(|(index, plate)| PlateBlock {
                        index,
                        caption: format!("{}{}", PLATE_TEXT_PREFIX, plate.text),
                        text: plate.text.clone(),
                        image_src: jpeg_src(&plate.plate_image),
                    })
                    .collect(),
            )
        } else {
            ResultsBody::NoPlates(NO_PLATES_MESSAGE)
        };

        let annotated_image = if response.result_image.is_empty() {
            None
        } else {
            Some(jpeg_src(&response.result_image))
        };

        Self {
            heading: RESULTS_HEADING,
            body,
            annotated_image,
        }
    }
}

/// 状態から View を作る
pub fn render(uploader: &Uploader) -> View {
    let state = uploader.state();

    let submit = if uploader.can_submit() {
        SubmitButton { label: SUBMIT_LABEL, enabled: true }
    } else {
        SubmitButton { label: BUSY_LABEL, enabled: false }
    };

    View {
        title: TITLE,
        chooser_label: CHOOSE_LABEL,
        file_name: uploader.selected_file().map(|f| f.file_name.clone()),
        preview: uploader.preview().map(str::to_string),
        submit,
        error: state.error_message().map(str::to_string),
        results: state.response().map(ResultsPanel::from_response),
    }
}
