//! textsnap: PDF・画像テキスト抽出CLI

pub mod cli;
pub mod config;
pub mod error;
pub mod ocr;
pub mod output;
pub mod runner;
pub mod scanner;
