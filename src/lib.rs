//! QuikDB フロントエンドのナビゲーションシェル。
//!
//! ルートテーブル、セクションごとのレイアウトフレーム、404 フォールバック、
//! そして React のソースから `createBrowserRouter` 宣言を読み取るスキャナを持つ。

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod scan;
pub mod table;

pub use error::{Result, ShellError};
pub use resolver::{resolve, Resolution, Shell};
pub use table::RouteTable;
