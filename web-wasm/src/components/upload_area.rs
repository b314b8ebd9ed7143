//! アップロードエリアコンポーネント
//!
//! ドロップまたはファイル選択で受け取った最初の1件だけを検証して親に渡す。

use leptos::html::Input;
use leptos::prelude::*;
use textsnap_common::types::FileInfo;
use textsnap_common::validator::{accept_attribute, validate_file};
use web_sys::{DragEvent, File, FileList};

#[component]
pub fn UploadArea<F>(
    /// 処理中は受け付けない
    busy: Signal<bool>,
    /// 検証・読み込みエラー
    error: RwSignal<Option<String>>,
    on_file: F,
) -> impl IntoView
where
    F: Fn(File) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<Input> = NodeRef::new();

    let handle_files = move |files: FileList| {
        let file = files.get(0);
        let info = file.as_ref().map(file_info);
        match validate_file(info.as_ref()) {
            Ok(()) => {
                error.set(None);
                if let Some(file) = file {
                    on_file(file);
                }
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let on_drop = {
        let handle_files = handle_files.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if busy.get_untracked() {
                return;
            }

            if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
                handle_files(files);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if !busy.get_untracked() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if busy.get_untracked() {
            return;
        }
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            handle_files(files);
        }
        // 同じファイルを続けて選べるように
        input.set_value("");
    };

    view! {
        <div
            class=move || {
                let mut classes = vec!["upload-area"];
                if is_dragover.get() {
                    classes.push("dragover");
                }
                if busy.get() {
                    classes.push("disabled");
                }
                classes.join(" ")
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <div class="upload-icon">"📄"</div>
            <p>"PDFまたは画像をドラッグ&ドロップ または クリックして選択"</p>
            <p class="text-muted">"対応形式: PDF, PNG, JPG, WEBP（25MBまで）"</p>
        </div>
        <input
            type="file"
            class="hidden-input"
            accept=accept_attribute()
            node_ref=input_ref
            disabled=move || busy.get()
            on:change=on_change
        />
        <Show when=move || error.with(|e| e.is_some())>
            <div class="upload-error">{move || error.get().unwrap_or_default()}</div>
        </Show>
    }
}

fn file_info(file: &File) -> FileInfo {
    FileInfo {
        name: file.name(),
        media_type: file.type_(),
        size: file.size() as u64,
    }
}
