// src/main.rs

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use path_absolutize::Absolutize;
use std::path::PathBuf;

use quikdb_shell::config::{OutputFormat, ShellConfig};
use quikdb_shell::layout::{dangling_targets, ensure_navigation};
use quikdb_shell::render::{compose, render_json, render_text};
use quikdb_shell::scan::{compare_with, scan_project, ScanReport};
use quikdb_shell::{RouteTable, Shell};

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "quikdb-shell",
    version,
    about = "QuikDB フロントエンドのルートを解決し、レイアウトとページの構成を表示する CLI ツール"
)]
struct Cli {
    /// TOML 設定ファイル
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// 出力形式 (設定ファイルの format より優先)
    #[arg(short = 'f', long = "format", value_enum, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// パスへ順に遷移し、それぞれの描画結果を表示する
    Resolve {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,
    },
    /// ルートテーブルを JSON で表示する
    Routes,
    /// サイドバーのリンク先がすべて宣言済みのルートか確認する
    Check,
    /// フロントエンドのソースから createBrowserRouter の宣言を読み取る
    /// 例: `scan --project-root ./src/app_frontend`
    Scan {
        #[arg(short = 'r', long = "project-root", value_name = "DIR")]
        project_root: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // 1) CLI 引数と設定ファイルを読み込む
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    let format = cli.format.unwrap_or(config.format);

    // 2) ルートテーブルを構築し、必要ならサイドバーとの整合性を確かめる
    let table = RouteTable::quikdb()?;
    if config.strict_navigation {
        ensure_navigation(&table)?;
    }

    // 3) サブコマンドを実行
    match cli.command {
        Command::Resolve { paths } => {
            let mut shell = Shell::new(table);
            for path in &paths {
                let view = compose(shell.navigate(path), &config);
                match format {
                    OutputFormat::Text => print!("{}", render_text(&view)),
                    OutputFormat::Json => println!("{}", render_json(&view)?),
                }
            }
        }
        Command::Routes => {
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Command::Check => {
            let dangling = dangling_targets(&table);
            for (section, item) in &dangling {
                println!("{}: `{}` -> {}", section.title(), item.label, item.href(*section));
            }
            if !dangling.is_empty() {
                std::process::exit(1);
            }
            println!("all sidebar targets resolve");
        }
        Command::Scan { project_root } => {
            let root = project_root.absolutize()?.to_path_buf();
            info!("scanning {}", root.display());
            // 組み込みテーブルとの差分をファイルごとに求める
            let reports = compare_with(&table, scan_project(&root)?)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
                OutputFormat::Text => {
                    for ScanReport { file, diff } in &reports {
                        println!("{}", file.source_file.display());
                        for name in &file.undeclared {
                            println!("  undeclared element: <{name} />");
                        }
                        if diff.is_empty() {
                            println!("  matches the built-in route table");
                        }
                        for route in &diff.missing {
                            println!("  missing: {route}");
                        }
                        for route in &diff.extra {
                            println!("  extra:   {route}");
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
