//! 検出結果パネル

use leptos::prelude::*;
use plate_detect_common::{ResultsBody, ResultsPanel};

#[component]
pub fn ResultPanel(panel: ResultsPanel) -> impl IntoView {
    let body = match panel.body {
        ResultsBody::Plates(blocks) => blocks
            .into_iter()
            .map(|block| {
                let alt = format!("Plate {}", block.index + 1);
                view! {
                    <div class="plate-card">
                        <p class="plate-text">{block.caption}</p>
                        <img class="plate-image" src=block.image_src alt=alt />
                    </div>
                }
            })
            .collect_view()
            .into_any(),
        ResultsBody::NoPlates(message) => view! { <p class="no-plates">{message}</p> }.into_any(),
    };

    view! {
        <section class="results">
            <h2>{panel.heading}</h2>
            <div class="plates">{body}</div>
            {panel.annotated_image.map(|src| view! {
                <img class="annotated-image" src=src alt="Annotated result" />
            })}
        </section>
    }
}
