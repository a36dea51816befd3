// src/layout.rs
use log::warn;
use serde::Serialize;

use crate::config::ShellConfig;
use crate::error::{Result, ShellError};
use crate::model::{Icon, NavItem, Section};
use crate::resolver::{resolve, split_path};
use crate::table::RouteTable;

const ORGANIZATION_NAV: &[NavItem] = &[
    NavItem::new("Overview", "", Icon::Dashboard),
    NavItem::new("Organizations", "list-organizations", Icon::FileText),
    NavItem::new("Create Organization", "create-organization", Icon::Plus),
    NavItem::new("Documentation", "documentation", Icon::ListBullet),
    NavItem::new("Settings", "settings", Icon::Gear),
];

const DASHBOARD_NAV: &[NavItem] = &[
    NavItem::new("Overview", "", Icon::Dashboard),
    NavItem::new("Projects", "projects", Icon::FileText),
    NavItem::new("Collaborators", "add-collaborators", Icon::PersonAdd),
    NavItem::new("User Management", "user-mgt", Icon::Person),
    NavItem::new("Analytics", "analytics", Icon::BarChart),
    NavItem::new("Rewards", "rewards", Icon::Bookmark),
    NavItem::new("Profile", "user-profile", Icon::Person),
];

/// セクションのサイドバー項目
pub fn navigation(section: Section) -> &'static [NavItem] {
    match section {
        Section::Organizations => ORGANIZATION_NAV,
        Section::Dashboard => DASHBOARD_NAV,
    }
}

/// サイドバー + ヘッダー + コンテンツ枠を持つセクションの外枠
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutFrame {
    pub section: Section,
    pub brand: String,
    pub header: Header,
    pub sidebar: Vec<NavLink>,
}

/// コンテンツ枠の上に固定表示されるヘッダー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: &'static str,
    /// 組織の切り替えメニューに表示する名前
    pub organization: String,
    pub account: String,
}

/// 描画用に展開したサイドバーのリンク
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
    pub icon: Icon,
    pub active: bool,
}

impl LayoutFrame {
    /// 現在のパスは引数で受け取り、それを基にアクティブな項目を決める
    pub fn new(section: Section, config: &ShellConfig, current_path: &str) -> Self {
        let current = split_path(current_path);
        let sidebar = navigation(section)
            .iter()
            .map(|item| {
                let href = item.href(section);
                let active = split_path(&href) == current;
                NavLink {
                    label: item.label,
                    href,
                    icon: item.icon,
                    active,
                }
            })
            .collect();

        LayoutFrame {
            section,
            brand: config.brand.clone(),
            header: Header {
                title: section.title(),
                organization: config.organization.clone(),
                account: config.account.clone(),
            },
            sidebar,
        }
    }

    pub fn active(&self) -> Option<&NavLink> {
        self.sidebar.iter().find(|link| link.active)
    }
}

/// サイドバーのリンク先がルートテーブルに存在するか確認する。
/// フォールバックや空の枠になるもの、別セクションに解決されるものを返す
pub fn dangling_targets(table: &RouteTable) -> Vec<(Section, &'static NavItem)> {
    let mut dangling = Vec::new();
    for section in [Section::Organizations, Section::Dashboard] {
        for item in navigation(section) {
            let resolution = resolve(table, &item.href(section));
            if resolution.is_fallback()
                || resolution.page.is_none()
                || resolution.frame() != Some(section)
            {
                warn!(
                    "sidebar item `{}` ({}) does not resolve inside the {} section",
                    item.label,
                    item.href(section),
                    section.title()
                );
                dangling.push((section, item));
            }
        }
    }
    dangling
}

/// dangling_targets が空でなければ最初の一件をエラーにする
pub fn ensure_navigation(table: &RouteTable) -> Result<()> {
    match dangling_targets(table).first() {
        Some((section, item)) => Err(ShellError::DanglingNavTarget {
            label: item.label.to_string(),
            target: item.href(*section),
        }),
        None => Ok(()),
    }
}
