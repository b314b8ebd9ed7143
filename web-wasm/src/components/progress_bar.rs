//! プログレスバーコンポーネント

use leptos::prelude::*;
use textsnap_common::{ExtractionProgress, ExtractionStatus};

#[component]
pub fn ProgressBar(progress: Signal<Option<ExtractionProgress>>) -> impl IntoView {
    view! {
        {move || {
            progress
                .get()
                .map(|p| {
                    view! {
                        <div class=format!("progress-container status-{}", p.status.as_str())>
                            <div class="progress-bar">
                                <div class="progress-fill" style=format!("width: {}%", p.progress) />
                            </div>
                            <p class="progress-text">{status_label(&p)}</p>
                        </div>
                    }
                })
        }}
    }
}

pub fn status_label(progress: &ExtractionProgress) -> String {
    match progress.status {
        ExtractionStatus::Idle => String::new(),
        ExtractionStatus::Uploading => format!("{} を読み込み中...", progress.file_name),
        ExtractionStatus::Extracting => {
            format!("{} を抽出中... {}%", progress.file_name, progress.progress)
        }
        ExtractionStatus::Complete => format!("✔ {} の抽出が完了しました", progress.file_name),
        ExtractionStatus::Error => progress
            .error
            .clone()
            .unwrap_or_else(|| format!("{} の抽出に失敗しました", progress.file_name)),
    }
}
