// src/table.rs
use log::debug;
use serde::Serialize;

use crate::error::{Result, ShellError};
use crate::model::{Component, RouteEntry, Segment};

/// アプリケーション全体のルートテーブル。構築後は変更しない
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// 宣言からテーブルを構築する。同じ階層に同じパスがあればエラー
    pub fn build(entries: Vec<RouteEntry>) -> Result<Self> {
        check_level("/", &entries)?;
        debug!("route table built with {} top-level entries", entries.len());
        Ok(RouteTable { entries })
    }

    /// QuikDB フロントエンドのルート宣言
    pub fn quikdb() -> Result<Self> {
        use Component::*;

        let organizations = RouteEntry::new("/organizations", OrgShell)?.with_children(vec![
            RouteEntry::new("", OrgOverview)?,
            RouteEntry::new("organizations", Organizations)?,
            RouteEntry::new("list-organizations", ListOrganizations)?,
            RouteEntry::new("create-organization", NewOrganization)?,
            RouteEntry::new("documentation", Documentation)?,
            RouteEntry::new("settings", OrgSettings)?,
        ]);

        // "projects" は ":projectId" より先に宣言する (先勝ち)
        let dashboard = RouteEntry::new("/dashboard", DashShell)?.with_children(vec![
            RouteEntry::new("", Dashboard)?,
            RouteEntry::new("projects", Projects)?,
            RouteEntry::new(":projectId", Project)?,
            RouteEntry::new("add-collaborators", Collaborators)?,
            RouteEntry::new("user-mgt", UserMgt)?,
            RouteEntry::new("user-invite", UserInvite)?,
            RouteEntry::new("user-profile", UserProfile)?,
            RouteEntry::new("rewards", Rewards)?,
            RouteEntry::new("analytics", Analytics)?,
        ]);

        RouteTable::build(vec![
            RouteEntry::new("/", Onboarding)?,
            RouteEntry::new("/signup", Signup)?,
            RouteEntry::new("/login", Login)?,
            RouteEntry::new("/forgot_password", ForgotPassword)?,
            RouteEntry::new("/authCode", AuthCode)?,
            organizations,
            dashboard,
            RouteEntry::new("*", NotFound)?,
        ])
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// 全ルートを絶対パスに展開して宣言順に返す (例: "/dashboard/:projectId")
    pub fn flatten(&self) -> Vec<(String, Component)> {
        let mut out = Vec::new();
        flatten_into("", &self.entries, &mut out);
        out
    }

    /// 二つのテーブルを (パス, コンポーネント) の組で比較する
    pub fn diff(&self, other: &RouteTable) -> TableDiff {
        let ours = self.flatten();
        let theirs = other.flatten();
        let describe = |(path, component): &(String, Component)| format!("{path} ({component})");

        TableDiff {
            missing: ours.iter().filter(|r| !theirs.contains(r)).map(describe).collect(),
            extra: theirs.iter().filter(|r| !ours.contains(r)).map(describe).collect(),
        }
    }
}

/// `RouteTable::diff` の結果
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableDiff {
    /// 基準テーブルにだけあるルート
    pub missing: Vec<String>,
    /// 比較対象にだけあるルート
    pub extra: Vec<String>,
}

impl TableDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

fn check_level(parent: &str, entries: &[RouteEntry]) -> Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        if entries[..i].iter().any(|prev| prev.segments == entry.segments) {
            return Err(ShellError::DuplicatePath {
                parent: parent.to_string(),
                path: entry.path.clone(),
            });
        }
        if !entry.children.is_empty() {
            check_level(&join(parent, &entry.segments), &entry.children)?;
        }
    }
    Ok(())
}

fn flatten_into(prefix: &str, entries: &[RouteEntry], out: &mut Vec<(String, Component)>) {
    for entry in entries {
        let full = join(prefix, &entry.segments);
        out.push((full.clone(), entry.component));
        flatten_into(&full, &entry.children, out);
    }
}

/// 親パスにセグメントを連結して正規化した絶対パスを作る
pub(crate) fn join(prefix: &str, segments: &[Segment]) -> String {
    let mut path = prefix.trim_end_matches('/').to_string();
    for segment in segments {
        path.push('/');
        match segment {
            Segment::Literal(s) => path.push_str(s),
            Segment::Param(name) => {
                path.push(':');
                path.push_str(name);
            }
            Segment::CatchAll => path.push('*'),
        }
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}
