//! メインアプリケーションコンポーネント

use crate::bridge::ocr::TesseractJs;
use crate::bridge::pdf::PdfJsParser;
use crate::components::{
    header::Header, progress_bar::ProgressBar, result_list::ResultList, result_view::ResultView,
    upload_area::UploadArea,
};
use crate::state::{GlooClearTimer, SignalState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use textsnap_common::{
    build_preview, ExtractionEngine, ExtractionOrchestrator, ExtractionState, ExtractionStatus,
    RunOutcome, StateCell, UploadedFile,
};

type WebOrchestrator = ExtractionOrchestrator<SignalState, GlooClearTimer>;
type WebEngine = ExtractionEngine<PdfJsParser, TesseractJs>;

#[component]
pub fn App() -> impl IntoView {
    let state = RwSignal::new(ExtractionState::new());
    let upload_error = RwSignal::new(None::<String>);

    let orchestrator: Rc<WebOrchestrator> =
        Rc::new(ExtractionOrchestrator::new(SignalState(state), GlooClearTimer));
    let engine: Rc<WebEngine> = Rc::new(ExtractionEngine::new(PdfJsParser, TesseractJs));

    let busy = Signal::derive(move || {
        state.with(|s| s.is_busy() || s.status() == ExtractionStatus::Uploading)
    });
    let progress = Signal::derive(move || state.with(|s| s.progress().cloned()));
    let active = Memo::new(move |_| state.with(|s| s.active_result().cloned()));

    let on_file = move |file: web_sys::File| {
        let name = file.name();
        let media_type = file.type_();
        if orchestrator.state().update(|s| s.stage_upload(&name)).is_err() {
            return;
        }

        let orchestrator = orchestrator.clone();
        let engine = engine.clone();
        spawn_local(async move {
            let blob = gloo::file::File::from(file);
            let read = gloo::file::futures::read_as_bytes(&blob);
            match build_preview(&media_type, read).await {
                Ok((preview_url, bytes)) => {
                    let upload = UploadedFile::new(name, media_type, bytes);
                    if let RunOutcome::Failed(message) =
                        orchestrator.run(&engine, &upload, preview_url).await
                    {
                        gloo::console::warn!(message);
                    }
                }
                Err(e) => {
                    upload_error.set(Some(e.to_string()));
                    orchestrator.state().update(|s| s.cancel_upload());
                }
            }
        });
    };

    view! {
        <div class="container">
            <Header />

            <UploadArea busy=busy error=upload_error on_file=on_file />

            <ProgressBar progress=progress />

            <Show
                when=move || active.with(|r| r.is_some())
                fallback=|| view! { <p class="text-muted">"抽出結果はここに表示されます"</p> }
            >
                <ResultView result=active />
            </Show>

            <ResultList state=state />
        </div>
    }
}
