//! Leptosシグナル上の抽出状態と自動クリアタイマー

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use std::time::Duration;
use textsnap_common::{ClearTimer, ExtractionState, StateCell};

#[derive(Clone, Copy)]
pub struct SignalState(pub RwSignal<ExtractionState>);

impl StateCell for SignalState {
    fn update<R>(&self, f: impl FnOnce(&mut ExtractionState) -> R) -> R {
        let mut pending = Some(f);
        let applied = self
            .0
            .try_update(|state| pending.take().map(|f| f(state)))
            .flatten();
        if let Some(result) = applied {
            return result;
        }

        // 破棄済みのシグナルには反映しない
        match pending {
            Some(f) => f(&mut ExtractionState::default()),
            None => unreachable!("update closure consumed without a result"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooClearTimer;

impl ClearTimer for GlooClearTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_state_returns_closure_value() {
        let state = SignalState(RwSignal::new(ExtractionState::new()));
        let generation = state.update(|s| s.begin("a.pdf"));
        assert_eq!(generation, Ok(1));
        assert!(state.0.with_untracked(|s| s.is_busy()));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn clear_timer_runs_task_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        GlooClearTimer.schedule(
            Duration::from_millis(10),
            Box::new(move || flag.store(true, Ordering::SeqCst)),
        );

        assert!(!fired.load(Ordering::SeqCst));
        gloo::timers::future::TimeoutFuture::new(50).await;
        assert!(fired.load(Ordering::SeqCst));
    }
}
