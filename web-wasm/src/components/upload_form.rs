//! 画像選択・プレビュー・送信フォーム

use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, HtmlInputElement};
use plate_detect_common::view::IMAGE_ACCEPT;
use plate_detect_common::{SelectedFile, View};

#[component]
pub fn UploadForm(
    state: Signal<View>,
    #[prop(into)] on_select: Callback<SelectedFile>,
    #[prop(into)] on_submit: Callback<()>,
) -> impl IntoView {
    // 読み込み中に別のファイルが選ばれたら古い方は捨てる
    let (read_generation, set_read_generation) = signal(0u64);

    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        set_read_generation.update(|g| *g += 1);
        let generation = read_generation.get_untracked();

        read_file(file, move |result| {
            if read_generation.get_untracked() != generation {
                gloo::console::debug!("stale file read dropped");
                return;
            }
            match result {
                Ok(selected) => on_select.run(selected),
                Err(message) => gloo::console::warn!(format!("image selection failed: {}", message)),
            }
        });
    };

    let on_form_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };

    view! {
        <form class="upload-form" on:submit=on_form_submit>
            <div class="chooser">
                <label class="choose-button">
                    {move || state.get().chooser_label}
                    <input
                        type="file"
                        accept=IMAGE_ACCEPT
                        style="display: none"
                        on:change=on_change
                    />
                </label>
                <span class="file-name">{move || state.get().file_name.unwrap_or_default()}</span>
            </div>

            {move || state.get().preview.map(|src| view! {
                <img class="preview" src=src alt="Preview" />
            })}

            <button type="submit" class="submit-button" disabled=move || !state.get().submit.enabled>
                {move || state.get().submit.label}
            </button>

            {move || state.get().error.map(|message| view! {
                <p class="error">{message}</p>
            })}
        </form>
    }
}

/// ファイルを読み込んで SelectedFile にする（失敗時は Err にメッセージ）
fn read_file<F>(file: File, on_done: F)
where
    F: FnOnce(Result<SelectedFile, String>) + 'static,
{
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(err) => return on_done(Err(js_message(&err))),
    };

    let file_name = file.name();
    let mime_type = file.type_();
    let on_done = Rc::new(RefCell::new(Some(on_done)));

    let onload = {
        let reader = reader.clone();
        let on_done = on_done.clone();
        Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
            let Some(done) = on_done.borrow_mut().take() else {
                return;
            };
            let result = reader
                .result()
                .map_err(|err| js_message(&err))
                .and_then(|buffer| {
                    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                    SelectedFile::new(file_name.clone(), mime_type.clone(), bytes)
                        .map_err(|err| err.to_string())
                });
            done(result);
        }) as Box<dyn FnMut(_)>)
    };

    let onerror = {
        let on_done = on_done.clone();
        Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
            if let Some(done) = on_done.borrow_mut().take() {
                done(Err("file read failed".to_string()));
            }
        }) as Box<dyn FnMut(_)>)
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    if let Err(err) = reader.read_as_array_buffer(&file) {
        if let Some(done) = on_done.borrow_mut().take() {
            done(Err(js_message(&err)));
        }
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
