//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header(title: &'static str) -> impl IntoView {
    view! {
        <header class="header">
            <h1>{title}</h1>
        </header>
    }
}
