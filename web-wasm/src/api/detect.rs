//! 検出バックエンド呼び出し（fetch + FormData）

use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};
use plate_detect_common::{decode_response, detect_endpoint, DetectionResponse, SelectedFile, FILE_FIELD};

/// 画像を `file` フィールドに入れたフォームを作る
pub fn build_form_data(file: &SelectedFile) -> Result<FormData, JsValue> {
    let parts = Array::of1(&Uint8Array::from(file.bytes.as_slice()));
    let options = BlobPropertyBag::new();
    options.set_type(&file.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(FILE_FIELD, &blob, &file.file_name)?;
    Ok(form)
}

/// `POST {backend}/detect` を1回だけ送る
///
/// 2xx以外・通信エラー・スキーマ違反はすべて Err。
pub async fn detect(backend_url: &str, file: &SelectedFile) -> Result<DetectionResponse, JsValue> {
    let url = detect_endpoint(backend_url);
    let form = build_form_data(file)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let request = Request::new_with_str_and_init(&url, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let text = JsFuture::from(resp.text()?).await?.as_string().unwrap_or_default();

    if !resp.ok() {
        gloo::console::warn!(format!("{} -> HTTP {}: {}", url, resp.status(), text));
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }

    decode_response(&text).map_err(|err| JsValue::from_str(&err.to_string()))
}
