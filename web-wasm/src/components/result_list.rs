//! 抽出結果一覧（新しい順）

use leptos::prelude::*;
use textsnap_common::{ExtractedResult, ExtractionState, FileType};

#[component]
pub fn ResultList(state: RwSignal<ExtractionState>) -> impl IntoView {
    view! {
        <Show when=move || state.with(|s| !s.results().is_empty())>
            <div class="result-list">
                <div class="result-list-header">
                    <h3>{move || format!("抽出結果 ({})", state.with(|s| s.results().len()))}</h3>
                    <button class="btn btn-secondary" on:click=move |_| state.update(|s| s.clear_results())>
                        "すべて削除"
                    </button>
                </div>
                <ul>
                    {move || {
                        state
                            .with(|s| {
                                s.results()
                                    .iter()
                                    .enumerate()
                                    .map(|(i, r)| {
                                        let class = if s.active_index() == Some(i) {
                                            "result-item active"
                                        } else {
                                            "result-item"
                                        };
                                        let label = entry_label(r);
                                        view! {
                                            <li class=class on:click=move |_| state.update(|s| s.select(Some(i)))>
                                                {label}
                                            </li>
                                        }
                                    })
                                    .collect_view()
                            })
                    }}
                </ul>
            </div>
        </Show>
    }
}

pub fn entry_label(result: &ExtractedResult) -> String {
    let kind = match result.file_type {
        FileType::Document => "PDF",
        FileType::Image => "画像",
    };
    format!(
        "{} ({}, {}文字, {})",
        result.file_name,
        kind,
        result.extracted_text.chars().count(),
        result.extracted_at.format("%H:%M:%S")
    )
}
