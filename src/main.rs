use anyhow::Context;
use clap::Parser;
use textsnap::{cli, config, ocr, output, runner, scanner};
use cli::{Cli, Commands};
use config::Config;
use textsnap_common::pdf::LopdfParser;
use textsnap_common::ExtractionEngine;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Extract { file, output: output_path, stdout, json } => {
            let engine = ExtractionEngine::new(LopdfParser::new(), ocr::TesseractCli::from_config(&config));
            let runner = if stdout {
                runner::Runner::new(engine).quiet()
            } else {
                println!("📝 textsnap - テキスト抽出\n");
                runner::Runner::new(engine)
            };

            let result = runner
                .extract_path(&file)
                .await
                .with_context(|| format!("{} の抽出に失敗しました", file.display()))?;

            if stdout {
                print!("{}", result.extracted_text);
            } else {
                let path = output::text_output_path(&file, output_path.as_deref(), config.output_dir.as_deref());
                output::write_text(&path, &result.extracted_text)?;
                println!("✔ テキストを保存: {}", path.display());
                if let Some(confidence) = result.confidence {
                    println!("  信頼度: {:.0}%", confidence);
                }
            }

            if let Some(json_path) = json {
                output::write_json(&json_path, &result)?;
                if !stdout {
                    println!("✔ JSONを保存: {}", json_path.display());
                }
            }
        }

        Commands::Batch { folder, output: output_dir, recursive, json } => {
            println!("📂 textsnap - 一括抽出\n");

            println!("[1/2] ファイルをスキャン中...");
            let files = scanner::scan_folder(&folder, recursive)?;
            println!("✔ {}件のファイルを検出\n", files.len());

            if files.is_empty() {
                return Err(textsnap::error::TextsnapError::NoFilesFound(folder.display().to_string()).into());
            }

            println!("[2/2] 抽出中...");
            let engine = ExtractionEngine::new(LopdfParser::new(), ocr::TesseractCli::from_config(&config));
            let runner = runner::Runner::new(engine);
            let output_dir = output_dir.or_else(|| config.output_dir.clone());

            let mut failed = 0usize;
            for (i, source) in files.iter().enumerate() {
                println!("  [{}/{}] {}", i + 1, files.len(), source.file_name);
                match runner.extract_path(&source.path).await {
                    Ok(result) => {
                        let path = output::text_output_path(&source.path, None, output_dir.as_deref());
                        output::write_text(&path, &result.extracted_text)?;
                    }
                    Err(e) => {
                        failed += 1;
                        println!("  ✗ {}: {}", source.file_name, e);
                    }
                }
            }

            let results = runner.results();
            if let Some(json_path) = json {
                output::write_json(&json_path, &results)?;
                println!("\n✔ JSONを保存: {}", json_path.display());
            }

            println!("\n✅ 完了: 成功 {}件 / 失敗 {}件", results.len(), failed);
        }

        Commands::Config { set_tesseract, set_timeout, show } => {
            let mut config = config;

            if let Some(path) = set_tesseract {
                config.set_tesseract(path)?;
                println!("✔ tesseractのパスを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  tesseract: {}", config.tesseract_command());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  出力先: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "入力ファイルと同じ場所".into())
                );
            }
        }
    }

    Ok(())
}
