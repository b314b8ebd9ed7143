//! 結果表示（左: プレビュー / 右: 抽出テキスト）

use crate::bridge::dom::{copy_text_js, download_text};
use crate::bridge::js_error_message;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use textsnap_common::{ExtractedResult, FileType};

/// コピー完了表示の時間
const COPIED_FEEDBACK_MS: u32 = 2000;

#[component]
pub fn ResultView(result: Memo<Option<ExtractedResult>>) -> impl IntoView {
    let (copied, set_copied) = signal(false);

    let on_copy = move |_| {
        let Some(text) = result.with_untracked(|r| r.as_ref().map(|r| r.extracted_text.clone())) else {
            return;
        };
        spawn_local(async move {
            match copy_text_js(&text).await {
                Ok(()) => {
                    set_copied.set(true);
                    Timeout::new(COPIED_FEEDBACK_MS, move || set_copied.set(false)).forget();
                }
                Err(e) => gloo::console::error!(format!("copy failed: {}", js_error_message(&e))),
            }
        });
    };

    let on_download = move |_| {
        result.with_untracked(|r| {
            if let Some(r) = r {
                download_text(r);
            }
        });
    };

    view! {
        {move || {
            result
                .get()
                .map(|r| {
                    let preview = match r.file_type {
                        FileType::Document => {
                            view! {
                                <iframe class="preview-frame" src=r.preview_url.clone() title=r.file_name.clone()></iframe>
                            }
                                .into_any()
                        }
                        FileType::Image => {
                            view! {
                                <img class="preview-image" src=r.preview_url.clone() alt=r.file_name.clone() />
                            }
                                .into_any()
                        }
                    };

                    view! {
                        <div class="result-view">
                            <div class="result-pane preview-pane">
                                <h3>{r.file_name.clone()}</h3>
                                {preview}
                            </div>
                            <div class="result-pane text-pane">
                                <div class="text-pane-header">
                                    <h3>"抽出テキスト"</h3>
                                    {r.confidence.map(|c| view! { <span class="badge">{confidence_label(c)}</span> })}
                                </div>
                                <pre class="extracted-text">{r.extracted_text.clone()}</pre>
                                <div class="actions">
                                    <button class="btn btn-primary" on:click=on_copy>
                                        {move || if copied.get() { "コピーしました" } else { "コピー" }}
                                    </button>
                                    <button class="btn btn-secondary" on:click=on_download>
                                        "テキストを保存"
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                })
        }}
    }
}

pub fn confidence_label(confidence: f32) -> String {
    format!("信頼度 {:.0}%", confidence)
}
