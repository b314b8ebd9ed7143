//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Text Extractor"</h1>
            <p class="text-muted">"PDF・画像からテキストを抽出（処理はすべてブラウザ内）"</p>
        </header>
    }
}
