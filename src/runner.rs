//! CLI用の抽出ランナー
//!
//! 状態は `tokio::sync::watch` に置き、進捗バーはその変更を購読して描画する。
//! ファイルは1件ずつ順に処理する。

use crate::error::{Result, TextsnapError};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use textsnap_common::orchestrator::Busy;
use textsnap_common::types::FileInfo;
use textsnap_common::validator::media_type_for_path;
use textsnap_common::{
    build_preview, validate_file, ClearTimer, DocumentParser, ExtractedResult, ExtractionEngine,
    ExtractionOrchestrator, ExtractionState, OcrEngine, RunOutcome, StateCell, UploadedFile,
};
use tokio::sync::watch;

/// 変更を購読できる状態セル
#[derive(Clone)]
pub struct WatchedState {
    tx: Arc<watch::Sender<ExtractionState>>,
}

impl WatchedState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ExtractionState::new());
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<ExtractionState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> ExtractionState {
        self.tx.borrow().clone()
    }
}

impl Default for WatchedState {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCell for WatchedState {
    fn update<R>(&self, f: impl FnOnce(&mut ExtractionState) -> R) -> R {
        let mut result = None;
        self.tx.send_modify(|state| result = Some(f(state)));
        match result {
            Some(r) => r,
            None => unreachable!("send_modify always runs the closure"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClearTimer;

impl ClearTimer for TokioClearTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

pub struct Runner<P, O> {
    engine: ExtractionEngine<P, O>,
    orchestrator: ExtractionOrchestrator<WatchedState, TokioClearTimer>,
    show_progress: bool,
}

impl<P, O> Runner<P, O>
where
    P: DocumentParser,
    O: OcrEngine,
{
    pub fn new(engine: ExtractionEngine<P, O>) -> Self {
        Self {
            engine,
            orchestrator: ExtractionOrchestrator::new(WatchedState::new(), TokioClearTimer),
            show_progress: true,
        }
    }

    /// 進捗バーを出さない（標準出力モード・テスト用）
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn state(&self) -> ExtractionState {
        self.orchestrator.state().snapshot()
    }

    /// これまでの結果（新しい順）
    pub fn results(&self) -> Vec<ExtractedResult> {
        self.state().results().to_vec()
    }

    /// 1ファイルを検証・読み込み・抽出する
    pub async fn extract_path(&self, path: &Path) -> Result<ExtractedResult> {
        if !path.is_file() {
            return Err(TextsnapError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let media_type = media_type_for_path(path);
        let info = FileInfo {
            name: file_name,
            media_type: media_type.to_string(),
            size: std::fs::metadata(path)?.len(),
        };
        validate_file(Some(&info))?;

        self.extract_read(info, tokio::fs::read(path)).await
    }

    /// 受付済みファイルを読み込みながら抽出する
    ///
    /// 読み込みに失敗したら `Uploading` の記録を取り消す。
    async fn extract_read<F, E>(&self, info: FileInfo, read: F) -> Result<ExtractedResult>
    where
        F: Future<Output = std::result::Result<Vec<u8>, E>>,
        E: Display,
    {
        self.orchestrator
            .state()
            .update(|s| s.stage_upload(&info.name))
            .map_err(busy_error)?;

        let (preview_url, bytes) = match build_preview(&info.media_type, read).await {
            Ok(preview) => preview,
            Err(e) => {
                self.orchestrator.state().update(|s| s.cancel_upload());
                return Err(e.into());
            }
        };
        let file = UploadedFile { info, bytes };

        match self.run_with_progress(&file, preview_url).await {
            RunOutcome::Completed(result) => Ok(result),
            RunOutcome::Failed(message) => Err(TextsnapError::Extraction(message)),
            RunOutcome::Busy => Err(busy_error(Busy)),
        }
    }

    async fn run_with_progress(&self, file: &UploadedFile, preview_url: String) -> RunOutcome {
        let bar = if self.show_progress {
            ProgressBar::new(100)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message(file.info.name.clone());

        let mut rx = self.orchestrator.state().subscribe();
        let watcher_bar = bar.clone();
        let watcher = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let percent = rx.borrow_and_update().progress().map(|p| p.progress);
                if let Some(percent) = percent {
                    watcher_bar.set_position(u64::from(percent));
                }
            }
        });

        let outcome = self.orchestrator.run(&self.engine, file, preview_url).await;
        watcher.abort();

        match &outcome {
            RunOutcome::Completed(_) => {
                bar.set_position(100);
                bar.finish();
            }
            _ => bar.abandon(),
        }
        outcome
    }
}

fn busy_error(e: Busy) -> TextsnapError {
    TextsnapError::Extraction(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use textsnap_common::pdf::LopdfParser;
    use textsnap_common::{ExtractionStatus, OcrOutput};

    struct NoOcr;

    impl OcrEngine for NoOcr {
        async fn recognize(
            &self,
            _bytes: &[u8],
            _media_type: &str,
            _language: &str,
            _on_progress: &dyn Fn(f32),
        ) -> std::result::Result<OcrOutput, String> {
            Err("unused".to_string())
        }
    }

    fn runner() -> Runner<LopdfParser, NoOcr> {
        Runner::new(ExtractionEngine::new(LopdfParser::new(), NoOcr)).quiet()
    }

    fn pdf_info() -> FileInfo {
        FileInfo {
            name: "gone.pdf".to_string(),
            media_type: "application/pdf".to_string(),
            size: 1024,
        }
    }

    #[tokio::test]
    async fn test_read_failure_cancels_upload() {
        let runner = runner();
        let read = async {
            Err::<Vec<u8>, _>(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "removed after validation",
            ))
        };

        let err = runner.extract_read(pdf_info(), read).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to read file");

        let state = runner.state();
        assert!(!state.is_busy());
        assert_eq!(state.status(), ExtractionStatus::Idle);
        assert!(state.results().is_empty());

        // 次のファイルは受け付けられる
        let read = async { Ok::<_, std::io::Error>(b"not a pdf".to_vec()) };
        let err = runner.extract_read(pdf_info(), read).await.unwrap_err();
        assert!(err.to_string().starts_with("PDF extraction failed:"));
    }
}
