// src/parser.rs
use log::{debug, warn};
use serde::Serialize;
use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser as SwcParser, StringInput, Syntax, TsConfig};
use swc_ecma_visit::{Visit, VisitWith};
use std::collections::{BTreeSet, HashMap, HashSet};

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShellError};
use crate::model::{Component, RouteEntry};
use crate::table::RouteTable;

/// ルーター関数の名前 (react-router-dom)
const ROUTER_FACTORIES: [&str; 3] = ["createBrowserRouter", "createHashRouter", "createMemoryRouter"];

/// ソースから読み取ったルート宣言
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecl {
    /// ルートのパス (例: "/", "projects", ""(インデックス) など)
    pub path: Option<String>,

    /// `element: <Foo />` または `Component: Foo` の要素名
    pub element: Option<String>,

    /// 子ルート (children) があれば再帰的に格納
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDecl>,
}

/// 一つのソースファイルの解析結果
#[derive(Debug, Clone, Serialize)]
pub struct RouterFile {
    /// このルート定義が書かれているソースファイルへの絶対パス
    pub source_file: PathBuf,
    pub routes: Vec<RouteDecl>,
    /// import もローカル宣言もされていないのに要素として使われた名前
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub undeclared: Vec<String>,
}

impl RouterFile {
    /// 宣言をルートテーブルに変換する。要素名が既知のコンポーネントでなければエラー
    pub fn to_table(&self) -> Result<RouteTable> {
        let entries = self.routes.iter().map(to_entry).collect::<Result<Vec<_>>>()?;
        RouteTable::build(entries)
    }
}

fn to_entry(decl: &RouteDecl) -> Result<RouteEntry> {
    let element = decl.element.as_deref().ok_or_else(|| {
        ShellError::UnknownComponent(format!(
            "<no element for path `{}`>",
            decl.path.as_deref().unwrap_or("")
        ))
    })?;
    let component: Component = element.parse()?;
    let children = decl.children.iter().map(to_entry).collect::<Result<Vec<_>>>()?;
    Ok(RouteEntry::new(decl.path.as_deref().unwrap_or(""), component)?.with_children(children))
}

/// AST をトラバースしてルート宣言を抽出するための Visitor
struct RouterVisitor {
    /// 見つかった RouteDecl を格納する Vec
    routes: Vec<RouteDecl>,
    /// 変数名とその配列リテラルのマッピング
    route_variables: HashMap<String, Vec<ObjectLit>>,
    /// import やローカル宣言で束縛された名前
    declared: HashSet<String>,
    router_calls: usize,
}

impl RouterVisitor {
    fn new() -> Self {
        RouterVisitor {
            routes: Vec::new(),
            route_variables: HashMap::new(),
            declared: HashSet::new(),
            router_calls: 0,
        }
    }

    /// `{ path: "dashboard", element: <Dash />, children: [...] }` を RouteDecl にする
    fn parse_route_object(&self, obj_lit: &ObjectLit) -> RouteDecl {
        let mut decl = RouteDecl {
            path: None,
            element: None,
            children: Vec::new(),
        };

        for prop in &obj_lit.props {
            let PropOrSpread::Prop(boxed_prop) = prop else {
                continue;
            };
            let Prop::KeyValue(KeyValueProp { key, value }) = &**boxed_prop else {
                continue;
            };
            let key_name = match key {
                PropName::Ident(ident) => ident.sym.to_string(),
                PropName::Str(s) => s.value.to_string(),
                _ => continue,
            };

            match key_name.as_str() {
                "path" => {
                    if let Expr::Lit(Lit::Str(Str { value: s, .. })) = &**value {
                        decl.path = Some(s.to_string());
                    }
                }
                "index" => {
                    if let Expr::Lit(Lit::Bool(Bool { value: true, .. })) = &**value {
                        decl.path.get_or_insert_with(String::new);
                    }
                }
                "element" => decl.element = element_name(value),
                "Component" => {
                    if let Expr::Ident(ident) = &**value {
                        decl.element = Some(ident.sym.to_string());
                    }
                }
                "children" => {
                    if let Expr::Array(arr_lit) = &**value {
                        decl.children = self.extract_routes_from_array(arr_lit);
                    }
                }
                _ => {}
            }
        }

        decl
    }

    /// 配列からルート宣言を抽出する
    fn extract_routes_from_array(&self, arr_lit: &ArrayLit) -> Vec<RouteDecl> {
        arr_lit
            .elems
            .iter()
            .flatten()
            .filter_map(|elem| match &*elem.expr {
                Expr::Object(obj) => Some(self.parse_route_object(obj)),
                _ => None,
            })
            .collect()
    }
}

/// `<Foo />` から "Foo" を取り出す
fn element_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::JSXElement(el) => match &el.opening.name {
            JSXElementName::Ident(ident) => Some(ident.sym.to_string()),
            _ => None,
        },
        Expr::Paren(ParenExpr { expr, .. }) => element_name(expr),
        _ => None,
    }
}

impl Visit for RouterVisitor {
    fn visit_import_decl(&mut self, import: &ImportDecl) {
        for spec in &import.specifiers {
            let local = match spec {
                ImportSpecifier::Named(s) => &s.local,
                ImportSpecifier::Default(s) => &s.local,
                ImportSpecifier::Namespace(s) => &s.local,
            };
            self.declared.insert(local.sym.to_string());
        }
    }

    fn visit_fn_decl(&mut self, fn_decl: &FnDecl) {
        self.declared.insert(fn_decl.ident.sym.to_string());
        fn_decl.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, class_decl: &ClassDecl) {
        self.declared.insert(class_decl.ident.sym.to_string());
        class_decl.visit_children_with(self);
    }

    /// 変数宣言を記録し、route を含む名前の配列はルート候補として保存する
    fn visit_var_decl(&mut self, var_decl: &VarDecl) {
        for declarator in &var_decl.decls {
            let Pat::Ident(BindingIdent { id, .. }) = &declarator.name else {
                continue;
            };
            let var_name = id.sym.to_string();
            self.declared.insert(var_name.clone());

            if !var_name.to_lowercase().contains("route") {
                continue;
            }
            if let Some(init_expr) = &declarator.init {
                if let Expr::Array(arr_lit) = &**init_expr {
                    let route_objects: Vec<ObjectLit> = arr_lit
                        .elems
                        .iter()
                        .flatten()
                        .filter_map(|elem| match &*elem.expr {
                            Expr::Object(obj) => Some(obj.clone()),
                            _ => None,
                        })
                        .collect();
                    if !route_objects.is_empty() {
                        debug!("variable `{}` holds {} route objects", var_name, route_objects.len());
                        self.route_variables.insert(var_name, route_objects);
                    }
                }
            }
        }

        var_decl.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        if let Callee::Expr(expr) = &call.callee {
            if let Expr::Ident(ident) = &**expr {
                let callee = ident.sym.to_string();
                if ROUTER_FACTORIES.contains(&callee.as_str()) {
                    self.router_calls += 1;
                    match call.args.first().map(|arg| &*arg.expr) {
                        // 直接配列リテラルの場合
                        Some(Expr::Array(arr_lit)) => {
                            let routes = self.extract_routes_from_array(arr_lit);
                            self.routes.extend(routes);
                        }
                        // 変数参照の場合
                        Some(Expr::Ident(arg)) => {
                            let var_name = arg.sym.to_string();
                            match self.route_variables.get(&var_name) {
                                Some(objects) => {
                                    let routes: Vec<RouteDecl> =
                                        objects.iter().map(|o| self.parse_route_object(o)).collect();
                                    self.routes.extend(routes);
                                }
                                None => warn!("{callee}: route variable `{var_name}` is not defined"),
                            }
                        }
                        _ => warn!("{callee}: first argument is neither an array nor a variable"),
                    }
                }
            }
        }
        call.visit_children_with(self);
    }
}

fn collect_elements(decls: &[RouteDecl], out: &mut BTreeSet<String>) {
    for decl in decls {
        if let Some(element) = &decl.element {
            out.insert(element.clone());
        }
        collect_elements(&decl.children, out);
    }
}

/// `.ts` は `<T>x` の型アサーションを書けるので JSX を無効にする。
/// それ以外 (.tsx/.jsx/.js) は JSX を有効にして読む
fn syntax_for(file_path: &Path) -> Syntax {
    let tsx = file_path.extension().and_then(|e| e.to_str()) != Some("ts");
    Syntax::Typescript(TsConfig {
        tsx,
        decorators: true,
        dts: false,
        no_early_errors: true,
        disallow_ambiguous_jsx_like: false,
    })
}

/// ソース文字列を解析する。構文は `file_path` の拡張子で選ぶ
pub fn parse_router_source(file_path: &Path, src: String) -> Result<RouterFile> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Real(file_path.to_path_buf()), src);

    let syntax = syntax_for(file_path);
    let lexer = Lexer::new(syntax, Default::default(), StringInput::from(&*fm), None);
    let mut parser = SwcParser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| ShellError::Parse {
        path: file_path.to_path_buf(),
        message: format!("{:?}", e.kind()),
    })?;

    let mut visitor = RouterVisitor::new();
    visitor.visit_module(&module);

    let mut elements = BTreeSet::new();
    collect_elements(&visitor.routes, &mut elements);
    let undeclared: Vec<String> = elements
        .into_iter()
        .filter(|name| !visitor.declared.contains(name))
        .collect();
    for name in &undeclared {
        warn!("{}: element <{name} /> is used but never imported or declared", file_path.display());
    }

    debug!(
        "{}: {} router call(s), {} top-level route(s)",
        file_path.display(),
        visitor.router_calls,
        visitor.routes.len()
    );

    Ok(RouterFile {
        source_file: file_path.to_path_buf(),
        routes: visitor.routes,
        undeclared,
    })
}

pub fn parse_router_file(file_path: &Path) -> Result<RouterFile> {
    let src = fs::read_to_string(file_path)?;
    parse_router_source(file_path, src)
}
