use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "textsnap")]
#[command(about = "PDF・画像からテキストを抽出するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 1ファイルからテキストを抽出
    Extract {
        /// PDF/PNG/JPG/WEBPファイル
        #[arg(required = true)]
        file: PathBuf,

        /// 出力テキストファイル（デフォルト: 入力と同じ場所の <名前>.txt）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ファイルに書かず標準出力へ
        #[arg(long)]
        stdout: bool,

        /// 抽出結果をJSONでも保存
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// フォルダ内のファイルを順に抽出
    Batch {
        /// 対象フォルダ
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力ディレクトリ（デフォルト: 各ファイルと同じ場所）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 結果一覧をJSONで保存（新しい順）
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// 設定管理
    Config {
        /// tesseract実行ファイルのパスを設定
        #[arg(long)]
        set_tesseract: Option<String>,

        /// OCRタイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
