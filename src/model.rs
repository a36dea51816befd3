// src/model.rs
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ShellError};

/// ルートパスを `/` で区切った一要素
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// そのまま一致させる文字列 (例: "projects")
    Literal(String),
    /// `:projectId` のような動的セグメント。空でない任意の値に一致する
    Param(String),
    /// `*`。残りのパスをすべて受け取る (最後の要素のみ)
    CatchAll,
}

impl Segment {
    /// ルート宣言のパス文字列をセグメント列に分解する。
    /// 空文字と "/" はどちらもインデックス (セグメントなし) を表す。
    pub fn parse_path(path: &str) -> Result<Vec<Segment>> {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = if *part == "*" {
                if i + 1 != parts.len() {
                    return Err(ShellError::InvalidPath {
                        path: path.to_string(),
                        reason: "catch-all must be the last segment",
                    });
                }
                Segment::CatchAll
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(ShellError::InvalidPath {
                        path: path.to_string(),
                        reason: "parameter name is empty",
                    });
                }
                Segment::Param(name.to_string())
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        Ok(segments)
    }
}

/// レイアウトフレームを持つセクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Organizations,
    Dashboard,
}

impl Section {
    /// サイドバーのリンクが相対的に解決される基準パス
    pub fn base_path(self) -> &'static str {
        match self {
            Section::Organizations => "/organizations",
            Section::Dashboard => "/dashboard",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Organizations => "Organizations",
            Section::Dashboard => "Dashboard",
        }
    }
}

/// ルートが描画するページ (またはレイアウト) コンポーネント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Onboarding,
    Signup,
    Login,
    ForgotPassword,
    AuthCode,
    OrgShell,
    OrgOverview,
    Organizations,
    ListOrganizations,
    NewOrganization,
    Documentation,
    OrgSettings,
    DashShell,
    Dashboard,
    Projects,
    Project,
    Collaborators,
    UserMgt,
    UserInvite,
    UserProfile,
    Rewards,
    Analytics,
    NotFound,
}

impl Component {
    pub const ALL: [Component; 23] = [
        Component::Onboarding,
        Component::Signup,
        Component::Login,
        Component::ForgotPassword,
        Component::AuthCode,
        Component::OrgShell,
        Component::OrgOverview,
        Component::Organizations,
        Component::ListOrganizations,
        Component::NewOrganization,
        Component::Documentation,
        Component::OrgSettings,
        Component::DashShell,
        Component::Dashboard,
        Component::Projects,
        Component::Project,
        Component::Collaborators,
        Component::UserMgt,
        Component::UserInvite,
        Component::UserProfile,
        Component::Rewards,
        Component::Analytics,
        Component::NotFound,
    ];

    /// フロントエンドの JSX 要素名
    pub fn name(self) -> &'static str {
        match self {
            Component::Onboarding => "Onboarding",
            Component::Signup => "Signup",
            Component::Login => "Login",
            Component::ForgotPassword => "ForgotPassword",
            Component::AuthCode => "AuthCode",
            Component::OrgShell => "Orgs",
            Component::OrgOverview => "Overview",
            Component::Organizations => "Organizations",
            Component::ListOrganizations => "ListOrganizations",
            Component::NewOrganization => "NewOrganization",
            Component::Documentation => "Documentation",
            Component::OrgSettings => "Settings",
            Component::DashShell => "Dash",
            Component::Dashboard => "Dashboard",
            Component::Projects => "Projects",
            Component::Project => "Project",
            Component::Collaborators => "Collaborators",
            Component::UserMgt => "UserMgt",
            Component::UserInvite => "UserInvite",
            Component::UserProfile => "UserProfile",
            Component::Rewards => "Rewards",
            Component::Analytics => "Analytics",
            Component::NotFound => "NoMatch",
        }
    }

    /// レイアウトコンポーネントなら、そのセクションを返す
    pub fn frame(self) -> Option<Section> {
        match self {
            Component::OrgShell => Some(Section::Organizations),
            Component::DashShell => Some(Section::Dashboard),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Component::Onboarding => "Create an account",
            Component::Signup => "Sign up",
            Component::Login => "Log in",
            Component::ForgotPassword => "Forgot password",
            Component::AuthCode => "Enter verification code",
            Component::OrgShell => "Organizations",
            Component::OrgOverview => "Organizations",
            Component::Organizations => "Welcome",
            Component::ListOrganizations => "Organizations",
            Component::NewOrganization => "Create Organization",
            Component::Documentation => "QuikDB Documentation",
            Component::OrgSettings => "Manage Settings",
            Component::DashShell => "Dashboard",
            Component::Dashboard => "Welcome",
            Component::Projects => "Projects",
            Component::Project => "Project",
            Component::Collaborators => "Project Collaborators",
            Component::UserMgt => "User Management",
            Component::UserInvite => "Invite Users",
            Component::UserProfile => "Profile",
            Component::Rewards => "Rewards",
            Component::Analytics => "Analytics",
            Component::NotFound => "404: Page Not Found",
        }
    }

    /// タイトル下に表示する固定の説明文
    pub fn summary(self) -> &'static str {
        match self {
            Component::Onboarding | Component::Signup => {
                "Enter your email to sign up for this app"
            }
            Component::Login => "Enter your email and password to continue",
            Component::ForgotPassword => "We will send a code to your email",
            Component::AuthCode => "Continue or resend code",
            Component::OrgShell | Component::DashShell => "",
            Component::OrgOverview => "Unlock API Access with Personal Tokens",
            Component::Organizations | Component::Dashboard => {
                "No Project Available. Create a new project to get started"
            }
            Component::ListOrganizations => "List of organizations will appear here",
            Component::NewOrganization => "Organization Details",
            Component::Documentation => "Guides and references for QuikDB",
            Component::OrgSettings => "Update your organization preferences",
            Component::Projects => "Real-time overview of your listed projects",
            Component::Project => "Groups and collaborators for this project",
            Component::Collaborators => "Add collaborators to your project",
            Component::UserMgt => "Manage the users of your organization",
            Component::UserInvite => "Send invitations to new users",
            Component::UserProfile => "Your account details",
            Component::Rewards => "Gems earned across your projects",
            Component::Analytics => "Usage metrics for your projects",
            Component::NotFound => "Uh oh! Wrong page 😞",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = ShellError;

    /// JSX 要素名からコンポーネントを引く。レイアウトには別名も許す
    fn from_str(s: &str) -> Result<Self> {
        let alias = match s {
            "OrgLayout" | "Organization" => Some(Component::OrgShell),
            "DashLayout" => Some(Component::DashShell),
            "NotFound" => Some(Component::NotFound),
            _ => None,
        };
        alias
            .or_else(|| Component::ALL.into_iter().find(|c| c.name() == s))
            .ok_or_else(|| ShellError::UnknownComponent(s.to_string()))
    }
}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// ルートテーブルの一エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// 宣言されたパス (例: "/", "projects", ":projectId", ""(インデックス))
    pub path: String,

    #[serde(skip)]
    pub segments: Vec<Segment>,

    pub component: Component,

    /// 子ルート (children) があれば宣言順に格納
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteEntry>,
}

impl RouteEntry {
    pub fn new(path: &str, component: Component) -> Result<Self> {
        Ok(RouteEntry {
            path: path.to_string(),
            segments: Segment::parse_path(path)?,
            component,
            children: Vec::new(),
        })
    }

    pub fn with_children(mut self, children: Vec<RouteEntry>) -> Self {
        self.children = children;
        self
    }

    pub fn is_index(&self) -> bool {
        self.segments.is_empty()
    }
}

/// サイドバーのアイコン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Dashboard,
    FileText,
    Person,
    PersonAdd,
    BarChart,
    Bookmark,
    Gear,
    ListBullet,
    Plus,
}

/// サイドバーのナビゲーション項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    /// セクションの基準パスからの相対パス ("" はインデックス)
    pub target_path: &'static str,
    pub icon: Icon,
}

impl NavItem {
    pub const fn new(label: &'static str, target_path: &'static str, icon: Icon) -> Self {
        NavItem { label, target_path, icon }
    }

    /// セクション内での絶対パス
    pub fn href(&self, section: Section) -> String {
        if self.target_path.is_empty() {
            section.base_path().to_string()
        } else {
            format!("{}/{}", section.base_path(), self.target_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_literal_param_and_catch_all() {
        assert!(Segment::parse_path("").unwrap().is_empty());
        assert!(Segment::parse_path("/").unwrap().is_empty());
        assert_eq!(
            Segment::parse_path("/dashboard/:projectId").unwrap(),
            vec![
                Segment::Literal("dashboard".into()),
                Segment::Param("projectId".into())
            ]
        );
        assert_eq!(Segment::parse_path("*").unwrap(), vec![Segment::CatchAll]);
    }

    #[test]
    fn rejects_misplaced_catch_all_and_empty_param() {
        assert!(matches!(
            Segment::parse_path("*/more"),
            Err(ShellError::InvalidPath { .. })
        ));
        assert!(matches!(
            Segment::parse_path("dashboard/:"),
            Err(ShellError::InvalidPath { .. })
        ));
    }

    #[test]
    fn component_names_round_trip_through_from_str() {
        for component in Component::ALL {
            assert_eq!(component.name().parse::<Component>().unwrap(), component);
        }
        assert_eq!("NotFound".parse::<Component>().unwrap(), Component::NotFound);
        assert!("Bogus".parse::<Component>().is_err());
    }

    #[test]
    fn nav_item_href_is_relative_to_section() {
        let overview = NavItem::new("Overview", "", Icon::Dashboard);
        let projects = NavItem::new("Projects", "projects", Icon::FileText);
        assert_eq!(overview.href(Section::Dashboard), "/dashboard");
        assert_eq!(projects.href(Section::Dashboard), "/dashboard/projects");
    }
}
