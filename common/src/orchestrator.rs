//! 抽出オーケストレータ
//!
//! 進捗レコード・結果リスト・処理中フラグ・選択中の結果を1つの状態構造体で持ち、
//! 遷移はすべてメソッド経由で行う。UIフレームワークの反応系には依存しない。
//!
//! 状態遷移: idle → extracting → {complete | error}
//! - complete は `CLEAR_DELAY` 後に idle へ戻る（世代番号が変わっていれば何もしない）
//! - error は次の抽出開始まで残る

use crate::engine::{DocumentParser, ExtractionEngine, OcrEngine};
use crate::types::{ExtractedResult, ExtractionProgress, ExtractionStatus, UploadedFile};
use chrono::Utc;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// 完了表示を消すまでの時間
pub const CLEAR_DELAY: Duration = Duration::from_secs(2);

/// 処理中に開始しようとした
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("an extraction is already in progress")]
pub struct Busy;

/// 自動クリアの予約券。発行時の世代でのみ有効
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearTicket {
    generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionState {
    progress: Option<ExtractionProgress>,
    results: Vec<ExtractedResult>,
    busy: bool,
    active: Option<usize>,
    generation: u64,
}

impl ExtractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> Option<&ExtractionProgress> {
        self.progress.as_ref()
    }

    pub fn status(&self) -> ExtractionStatus {
        self.progress
            .as_ref()
            .map(|p| p.status)
            .unwrap_or(ExtractionStatus::Idle)
    }

    /// 新しい順
    pub fn results(&self) -> &[ExtractedResult] {
        &self.results
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_result(&self) -> Option<&ExtractedResult> {
        self.active.and_then(|i| self.results.get(i))
    }

    /// 読み込み中の表示（処理中なら無視）
    pub fn stage_upload(&mut self, file_name: &str) -> Result<(), Busy> {
        if self.busy {
            return Err(Busy);
        }
        self.progress = Some(ExtractionProgress::new(file_name, ExtractionStatus::Uploading));
        Ok(())
    }

    /// 読み込み失敗時に読み込み中の表示を取り下げる
    pub fn cancel_upload(&mut self) {
        if self.status() == ExtractionStatus::Uploading {
            self.progress = None;
        }
    }

    /// 抽出開始。世代番号を返す
    pub fn begin(&mut self, file_name: &str) -> Result<u64, Busy> {
        if self.busy {
            return Err(Busy);
        }
        self.busy = true;
        self.generation += 1;
        self.active = None;
        self.progress = Some(ExtractionProgress::new(file_name, ExtractionStatus::Extracting));
        Ok(self.generation)
    }

    /// 進捗を反映する
    ///
    /// 古い世代・抽出中以外・現在値より小さい値は無視する。
    pub fn record_progress(&mut self, generation: u64, percent: u8) {
        if generation != self.generation {
            return;
        }
        if let Some(progress) = self.progress.as_mut() {
            if progress.status == ExtractionStatus::Extracting {
                progress.progress = progress.progress.max(percent.min(100));
            }
        }
    }

    /// 成功: 先頭に追加して完了表示にする
    pub fn complete(&mut self, result: ExtractedResult) -> ClearTicket {
        let file_name = result.file_name.clone();
        self.results.insert(0, result);
        // 抽出中にユーザーが選んだ結果があれば、それを指し続ける
        self.active = Some(self.active.map_or(0, |i| i + 1));
        self.progress = Some(ExtractionProgress {
            file_name,
            progress: 100,
            status: ExtractionStatus::Complete,
            error: None,
        });
        self.busy = false;
        ClearTicket {
            generation: self.generation,
        }
    }

    /// 失敗: エラー表示にする（結果リストは変更しない）
    pub fn fail(&mut self, message: impl Into<String>) {
        let file_name = self
            .progress
            .as_ref()
            .map(|p| p.file_name.clone())
            .unwrap_or_default();
        self.progress = Some(ExtractionProgress {
            file_name,
            progress: 0,
            status: ExtractionStatus::Error,
            error: Some(message.into()),
        });
        self.busy = false;
    }

    /// 予約された自動クリア。クリアしたらtrue
    pub fn expire(&mut self, ticket: ClearTicket) -> bool {
        if ticket.generation != self.generation || self.status() != ExtractionStatus::Complete {
            return false;
        }
        self.progress = None;
        true
    }

    /// 結果を全消去（処理中の抽出には影響しない）
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.active = None;
    }

    /// 範囲外の指定は選択解除扱い
    pub fn select(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.results.len());
    }
}

/// 状態の置き場所（Mutex・watchチャネル付き・Leptosシグナルなど）
pub trait StateCell {
    fn update<R>(&self, f: impl FnOnce(&mut ExtractionState) -> R) -> R;
}

impl StateCell for Arc<Mutex<ExtractionState>> {
    fn update<R>(&self, f: impl FnOnce(&mut ExtractionState) -> R) -> R {
        let mut state = self.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

/// 遅延実行（tokio・gloo timers など）
pub trait ClearTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>);
}

/// 1回の実行結果
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Busy,
    Completed(ExtractedResult),
    Failed(String),
}

pub struct ExtractionOrchestrator<S, T> {
    state: S,
    timer: T,
}

impl<S, T> ExtractionOrchestrator<S, T>
where
    S: StateCell + Clone + Send + 'static,
    T: ClearTimer,
{
    pub fn new(state: S, timer: T) -> Self {
        Self { state, timer }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// 抽出を1回実行する。失敗はすべてここで吸収して進捗レコードに残す
    pub async fn run<P, O>(
        &self,
        engine: &ExtractionEngine<P, O>,
        file: &UploadedFile,
        preview_url: String,
    ) -> RunOutcome
    where
        P: DocumentParser,
        O: OcrEngine,
    {
        let file_name = file.info.name.clone();
        let generation = match self.state.update(|s| s.begin(&file_name)) {
            Ok(generation) => generation,
            Err(Busy) => {
                tracing::warn!("extraction already running, ignoring {}", file_name);
                return RunOutcome::Busy;
            }
        };

        let state = &self.state;
        let reporter = move |percent: u8| state.update(|s| s.record_progress(generation, percent));

        match engine.extract(file, &reporter).await {
            Ok(output) => {
                let result = ExtractedResult {
                    file_name,
                    file_type: file.file_type(),
                    extracted_text: output.text,
                    preview_url,
                    confidence: output.confidence,
                    extracted_at: Utc::now(),
                };
                tracing::info!(
                    "extracted {} chars from {}",
                    result.extracted_text.chars().count(),
                    result.file_name
                );
                let ticket = self.state.update(|s| s.complete(result.clone()));
                self.schedule_clear(ticket);
                RunOutcome::Completed(result)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("{}: {}", file_name, message);
                self.state.update(|s| s.fail(message.clone()));
                RunOutcome::Failed(message)
            }
        }
    }

    pub fn clear_results(&self) {
        self.state.update(|s| s.clear_results());
    }

    fn schedule_clear(&self, ticket: ClearTicket) {
        let state = self.state.clone();
        self.timer.schedule(
            CLEAR_DELAY,
            Box::new(move || {
                state.update(|s| s.expire(ticket));
            }),
        );
    }
}
