// src/config.rs
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// `--config` で渡す TOML 設定
///
/// ```toml
/// brand = "quikDB"
/// organization = "Acme Org"
/// account = "Ada"
/// format = "json"
/// strict_navigation = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// サイドバーに表示するブランド名
    pub brand: String,
    /// ヘッダーの組織メニューに表示する名前
    pub organization: String,
    pub account: String,
    pub format: OutputFormat,
    /// true ならサイドバーのリンク切れで起動を失敗させる
    pub strict_navigation: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            brand: "quikDB".to_string(),
            organization: "My Organization".to_string(),
            account: "My Account".to_string(),
            format: OutputFormat::Text,
            strict_navigation: false,
        }
    }
}

impl ShellConfig {
    pub fn from_toml(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        info!("loading config from {}", path.display());
        let src = fs::read_to_string(path)?;
        Self::from_toml(&src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ShellConfig::from_toml("").unwrap(), ShellConfig::default());
    }

    #[test]
    fn reads_all_fields() {
        let config = ShellConfig::from_toml(
            "brand = \"Acme\"\norganization = \"Acme Org\"\nformat = \"json\"\nstrict_navigation = true\n",
        )
        .unwrap();
        assert_eq!(config.brand, "Acme");
        assert_eq!(config.organization, "Acme Org");
        assert_eq!(config.account, "My Account");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.strict_navigation);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ShellConfig::from_toml("colour = \"blue\""),
            Err(ShellError::Config(_))
        ));
    }
}
