// src/scan.rs
use log::{debug, info, warn};
use path_absolutize::Absolutize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, ShellError};
use crate::parser::{parse_router_file, RouterFile};
use crate::table::{RouteTable, TableDiff};

const SOURCE_EXTENSIONS: [&str; 4] = ["tsx", "jsx", "ts", "js"];
const SKIPPED_DIRS: [&str; 3] = ["node_modules", "dist", "build"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

/// ルーター宣言を含みそうなファイル名か
fn is_router_candidate(path: &Path) -> bool {
    let has_source_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
    if !has_source_ext {
        return false;
    }
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    matches!(stem, "App" | "router" | "routes") || stem.ends_with("Router") || stem.ends_with("Routes")
}

/// プロジェクトルート以下を再帰的に探索し、候補ファイルを絶対パスで返す
pub fn find_router_candidates(project_root: &Path) -> Result<Vec<PathBuf>> {
    let root = project_root.absolutize()?.to_path_buf();
    let mut candidates: Vec<PathBuf> = WalkDir::new(&root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_router_candidate(e.path()))
        .map(|e| e.into_path())
        .collect();

    candidates.sort();
    candidates.dedup();
    debug!("{} router candidate(s) under {}", candidates.len(), root.display());
    Ok(candidates)
}

/// 候補ファイルを解析し、ルート宣言を持つものだけを返す。
/// 構文エラーのファイルは警告を出して読み飛ばす
pub fn scan_project(project_root: &Path) -> Result<Vec<RouterFile>> {
    let mut found = Vec::new();
    for path in find_router_candidates(project_root)? {
        info!("解析中: {}", path.display());
        let file = match parse_router_file(&path) {
            Ok(file) => file,
            Err(err @ ShellError::Parse { .. }) => {
                warn!("skipping {}: {err}", path.display());
                continue;
            }
            Err(err) => return Err(err),
        };
        if !file.routes.is_empty() {
            found.push(file);
        }
    }

    if found.is_empty() {
        return Err(ShellError::NoRouterFound(project_root.to_path_buf()));
    }
    Ok(found)
}

/// 一ファイル分の宣言と、組み込みテーブルとの差分
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub file: RouterFile,
    pub diff: TableDiff,
}

/// 宣言をテーブルに変換して基準テーブルと比べる。未知の要素名はエラー
pub fn compare_with(baseline: &RouteTable, files: Vec<RouterFile>) -> Result<Vec<ScanReport>> {
    files
        .into_iter()
        .map(|file| {
            let diff = baseline.diff(&file.to_table()?);
            Ok(ScanReport { file, diff })
        })
        .collect()
}
