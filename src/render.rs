// src/render.rs
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ShellConfig;
use crate::error::Result;
use crate::layout::LayoutFrame;
use crate::model::Component;
use crate::resolver::Resolution;

/// コンテンツ枠に入るページの描画内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub component: Component,
    pub title: String,
    pub summary: &'static str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

/// 解決結果をフレームとページに組み立てたもの
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub path: String,
    pub route: Option<String>,
    /// 外側から順に並ぶレイアウトフレーム。フォールバックでは空
    pub frames: Vec<LayoutFrame>,
    /// 空のコンテンツ枠なら None
    pub page: Option<PageView>,
}

pub fn compose(resolution: &Resolution, config: &ShellConfig) -> View {
    let frames = resolution
        .frames
        .iter()
        .map(|section| LayoutFrame::new(*section, config, &resolution.path))
        .collect();

    let page = resolution.page.map(|page| {
        let title = match (page, resolution.param("projectId")) {
            (Component::Project, Some(id)) => format!("{} / {}", page.title(), id),
            _ => page.title().to_string(),
        };
        PageView {
            component: page,
            title,
            summary: page.summary(),
            params: resolution.params.clone(),
        }
    });

    View {
        path: resolution.path.clone(),
        route: resolution.route.clone(),
        frames,
        page,
    }
}

/// 端末向けのテキスト表示
impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            writeln!(f, "{} · {}", frame.brand, frame.header.title)?;
            writeln!(f, "{} ▾  {}", frame.header.organization, frame.header.account)?;
            for link in &frame.sidebar {
                let marker = if link.active { "▸" } else { " " };
                writeln!(f, "  {marker} {:<22}{}", link.label, link.href)?;
            }
            writeln!(f, "{}", "─".repeat(40))?;
        }

        if let Some(page) = &self.page {
            writeln!(f, "{}", page.title)?;
            if !page.summary.is_empty() {
                writeln!(f, "{}", page.summary)?;
            }
        }
        Ok(())
    }
}

pub fn render_text(view: &View) -> String {
    view.to_string()
}

pub fn render_json(view: &View) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}
