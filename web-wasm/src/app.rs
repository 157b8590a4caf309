//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use crate::api::detect::detect;
use crate::components::{header::Header, result_panel::ResultPanel, upload_form::UploadForm};
use plate_detect_common::view::TITLE;
use plate_detect_common::{render, SelectedFile, Uploader};

/// メインアプリケーションコンポーネント
///
/// バックエンドURLは呼び出し側から渡す。
#[component]
pub fn App(backend_url: String) -> impl IntoView {
    let (uploader, set_uploader) = signal(Uploader::new());
    let state = Signal::derive(move || uploader.with(render));

    let on_select = move |file: SelectedFile| {
        set_uploader.update(|u| u.select_file(file));
    };

    let on_submit = move |_: ()| {
        let mut submission = None;
        set_uploader.update(|u| match u.submit() {
            Ok(s) => submission = Some(s),
            Err(err) => gloo::console::warn!(format!("submit rejected: {}", err)),
        });
        let Some(submission) = submission else {
            return;
        };

        let backend_url = backend_url.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = detect(&backend_url, &submission.file).await;
            if let Err(err) = &result {
                gloo::console::error!("detection failed:", err.clone());
            }

            set_uploader.update(|u| {
                if !u.complete(submission.token, result) {
                    gloo::console::debug!(format!("stale response dropped (token {})", submission.token.value()));
                }
            });
        });
    };

    view! {
        <div class="container">
            <Header title=TITLE />

            <UploadForm state=state on_select=Callback::new(on_select) on_submit=Callback::new(on_submit) />

            {move || state.get().results.map(|panel| view! { <ResultPanel panel=panel /> })}
        </div>
    }
}
