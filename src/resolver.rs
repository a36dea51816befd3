// src/resolver.rs
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Component, RouteEntry, Section, Segment};
use crate::table::{RouteTable, join};

/// パスを解決した結果。レイアウトフレームとコンテンツ枠に入るページの組
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// 正規化済みの要求パス (クエリとフラグメントは除く)
    pub path: String,

    /// 一致したルートのパターン (例: "/dashboard/:projectId")。
    /// どのエントリにも一致しなかった場合は None
    pub route: Option<String>,

    /// 外側から順に並べたレイアウトフレーム
    pub frames: Vec<Section>,

    /// コンテンツ枠に描画されるコンポーネント。
    /// レイアウトの基準パスに一致するインデックス子ルートがなければ None (空の枠)
    pub page: Option<Component>,

    /// 動的セグメントの値 (例: projectId → "42")
    pub params: BTreeMap<String, String>,
}

impl Resolution {
    fn fallback(path: String) -> Self {
        Resolution {
            path,
            route: None,
            frames: Vec::new(),
            page: Some(Component::NotFound),
            params: BTreeMap::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.page == Some(Component::NotFound)
    }

    /// ページを囲む一番内側のフレーム
    pub fn frame(&self) -> Option<Section> {
        self.frames.last().copied()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// URL パスをセグメントに分解する。`?` と `#` 以降、および空セグメントは無視する
pub fn split_path(path: &str) -> Vec<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').filter(|s| !s.is_empty()).collect()
}

/// テーブルからパスに一致するルートを一つ選ぶ。
/// 宣言順に試し、最初に一致したものを採用する。
pub fn resolve(table: &RouteTable, path: &str) -> Resolution {
    let segments = split_path(path);
    let normalized = format!("/{}", segments.join("/"));

    let mut chain: Vec<&RouteEntry> = Vec::new();
    let mut params = BTreeMap::new();

    if !match_level(table.entries(), &segments, &mut params, &mut chain) {
        debug!("no route matched {normalized}; rendering fallback");
        return Resolution::fallback(normalized);
    }

    let mut route = String::new();
    for entry in &chain {
        route = join(&route, &entry.segments);
    }

    let frames = chain.iter().filter_map(|e| e.component.frame()).collect();
    // 末尾が子を持つエントリなら、どの子にも一致しなかったので枠は空
    let page = chain
        .last()
        .filter(|e| e.children.is_empty())
        .map(|e| e.component);

    debug!("{normalized} resolved to {route} ({page:?})");
    Resolution {
        path: normalized,
        route: Some(route),
        frames,
        page,
        params,
    }
}

fn match_level<'a>(
    entries: &'a [RouteEntry],
    segments: &[&str],
    params: &mut BTreeMap<String, String>,
    chain: &mut Vec<&'a RouteEntry>,
) -> bool {
    for entry in entries {
        let mut bound = params.clone();
        let Some(rest) = match_prefix(&entry.segments, segments, &mut bound) else {
            continue;
        };

        chain.push(entry);
        let matched = if entry.children.is_empty() {
            rest.is_empty()
        } else {
            // 子に一致しなくても、残りがなければ空の枠でレイアウトだけ描画する
            match_level(&entry.children, rest, &mut bound, chain) || rest.is_empty()
        };

        if matched {
            *params = bound;
            return true;
        }
        chain.pop();
    }
    false
}

/// パターンがパスの先頭に一致すれば残りのセグメントを返す
fn match_prefix<'p, 's>(
    pattern: &[Segment],
    segments: &'p [&'s str],
    params: &mut BTreeMap<String, String>,
) -> Option<&'p [&'s str]> {
    for (i, segment) in pattern.iter().enumerate() {
        match segment {
            Segment::CatchAll => {
                params.insert("*".to_string(), segments[i.min(segments.len())..].join("/"));
                return Some(&[]);
            }
            Segment::Literal(expected) => {
                if segments.get(i) != Some(&expected.as_str()) {
                    return None;
                }
            }
            Segment::Param(name) => {
                let value = segments.get(i)?;
                params.insert(name.clone(), (*value).to_string());
            }
        }
    }
    segments.get(pattern.len()..)
}

/// ナビゲーションの状態。常に「解決済み」の一状態で、遷移のたびに置き換わる
#[derive(Debug, Clone)]
pub struct Shell {
    table: RouteTable,
    current: Resolution,
}

impl Shell {
    /// ルート "/" を表示した状態で始める
    pub fn new(table: RouteTable) -> Self {
        let current = resolve(&table, "/");
        Shell { table, current }
    }

    pub fn navigate(&mut self, path: &str) -> &Resolution {
        self.current = resolve(&self.table, path);
        &self.current
    }

    pub fn current(&self) -> &Resolution {
        &self.current
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::quikdb().unwrap()
    }

    #[test]
    fn split_path_ignores_query_fragment_and_empty_segments() {
        assert_eq!(split_path("/dashboard//projects/?tab=1#top"), vec!["dashboard", "projects"]);
        assert!(split_path("/").is_empty());
        assert!(split_path("").is_empty());
    }

    #[test]
    fn root_renders_onboarding_without_frame() {
        let r = resolve(&table(), "/");
        assert_eq!(r.page, Some(Component::Onboarding));
        assert!(r.frames.is_empty());
        assert_eq!(r.route.as_deref(), Some("/"));
    }

    #[test]
    fn section_base_renders_index_child_inside_frame() {
        let r = resolve(&table(), "/organizations");
        assert_eq!(r.frames, vec![Section::Organizations]);
        assert_eq!(r.page, Some(Component::OrgOverview));

        let r = resolve(&table(), "/dashboard/");
        assert_eq!(r.frame(), Some(Section::Dashboard));
        assert_eq!(r.page, Some(Component::Dashboard));
    }

    #[test]
    fn literal_child_wins_over_dynamic_segment() {
        let r = resolve(&table(), "/dashboard/projects");
        assert_eq!(r.page, Some(Component::Projects));
        assert!(r.params.is_empty());
    }

    #[test]
    fn dynamic_segment_exposes_project_id() {
        let r = resolve(&table(), "/dashboard/42");
        assert_eq!(r.page, Some(Component::Project));
        assert_eq!(r.param("projectId"), Some("42"));
        assert_eq!(r.route.as_deref(), Some("/dashboard/:projectId"));
    }

    #[test]
    fn catch_all_captures_unmatched_path() {
        let r = resolve(&table(), "/dashboard/42/extra");
        assert!(r.is_fallback());
        assert!(r.frames.is_empty());
        assert_eq!(r.route.as_deref(), Some("/*"));
        assert_eq!(r.param("*"), Some("dashboard/42/extra"));
    }

    #[test]
    fn table_without_catch_all_still_falls_back() {
        let table = RouteTable::build(vec![RouteEntry::new("/login", Component::Login).unwrap()])
            .unwrap();
        let r = resolve(&table, "/nope");
        assert!(r.is_fallback());
        assert_eq!(r.route, None);
        assert_eq!(r.path, "/nope");
    }

    #[test]
    fn failed_branch_does_not_leak_params() {
        let shell = RouteEntry::new("/p/:id", Component::DashShell)
            .unwrap()
            .with_children(vec![RouteEntry::new("settings", Component::OrgSettings).unwrap()]);
        let table = RouteTable::build(vec![
            shell,
            RouteEntry::new("/p/:slug/info", Component::Project).unwrap(),
        ])
        .unwrap();
        let r = resolve(&table, "/p/7/info");
        assert_eq!(r.page, Some(Component::Project));
        assert_eq!(r.param("slug"), Some("7"));
        assert_eq!(r.param("id"), None);
    }

    #[test]
    fn layout_without_index_child_renders_empty_slot() {
        let dash = RouteEntry::new("/dashboard", Component::DashShell)
            .unwrap()
            .with_children(vec![RouteEntry::new("projects", Component::Projects).unwrap()]);
        let table = RouteTable::build(vec![dash]).unwrap();

        let r = resolve(&table, "/dashboard");
        assert!(!r.is_fallback());
        assert_eq!(r.frames, vec![Section::Dashboard]);
        assert_eq!(r.page, None);
        assert_eq!(r.route.as_deref(), Some("/dashboard"));

        let r = resolve(&table, "/dashboard/projects");
        assert_eq!(r.page, Some(Component::Projects));
        assert!(resolve(&table, "/dashboard/other").is_fallback());
    }

    #[test]
    fn shell_replaces_resolution_on_each_navigation() {
        let mut shell = Shell::new(table());
        assert_eq!(shell.current().page, Some(Component::Onboarding));
        assert_eq!(shell.navigate("/login").page, Some(Component::Login));
        assert!(shell.navigate("/nonexistent").is_fallback());
        assert_eq!(shell.current().path, "/nonexistent");
    }
}
