//! textsnap Common Library
//!
//! CLIとWeb(WASM)で共有される検証・プレビュー・抽出・状態管理

pub mod engine;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod preview;
pub mod types;
pub mod validator;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use engine::{
    DocumentParser, ExtractionEngine, ExtractionOutput, OcrEngine, OcrOutput, PdfDocument,
    ProgressReporter, TextFragment,
};
pub use error::{Error, ExtractionError, PreviewError, Result, ValidationError};
pub use export::{text_file_bytes, text_file_name};
pub use orchestrator::{
    ClearTicket, ClearTimer, ExtractionOrchestrator, ExtractionState, RunOutcome, StateCell,
    CLEAR_DELAY,
};
pub use preview::{build_preview, data_url};
pub use types::{
    ExtractedResult, ExtractionProgress, ExtractionStatus, FileInfo, FileType, UploadedFile,
};
pub use validator::{validate_file, MAX_FILE_SIZE};
