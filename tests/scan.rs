use std::fs;

use quikdb_shell::scan::{compare_with, find_router_candidates, scan_project};
use quikdb_shell::{RouteTable, ShellError};

const APP_TSX: &str = r#"
import { createBrowserRouter, RouterProvider } from 'react-router-dom';
import Onboarding from './pages/onboarding';

function App() {
  const router = createBrowserRouter([
    { path: "/", element: <Onboarding /> },
    { path: "*", element: <NoMatch /> },
  ]);
  return <RouterProvider router={router} />;
}

function NoMatch() {
  return <h2>404: Page Not Found</h2>;
}

export default App;
"#;

#[test]
fn scans_router_declarations_and_skips_dependencies() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let deps = dir.path().join("node_modules").join("lib");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&deps).unwrap();
    fs::write(src.join("App.tsx"), APP_TSX).unwrap();
    fs::write(src.join("App.jsx"), "function App() { return <main />; }\nexport default App;\n").unwrap();
    fs::write(deps.join("routes.js"), APP_TSX).unwrap();

    let candidates = find_router_candidates(dir.path()).unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|p| p.is_absolute()));

    let files = scan_project(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].source_file.ends_with("src/App.tsx"));
    assert!(files[0].undeclared.is_empty());

    let scanned = files[0].to_table().unwrap();
    let diff = quikdb_shell::RouteTable::quikdb().unwrap().diff(&scanned);
    assert!(diff.extra.is_empty());
    assert!(diff.missing.contains(&"/dashboard/:projectId (Project)".to_string()));
}

fn project_with_app() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("App.tsx"), APP_TSX).unwrap();
    dir
}

#[test]
fn plain_ts_type_assertions_do_not_abort_the_scan() {
    let dir = project_with_app();
    fs::write(
        dir.path().join("src").join("routes.ts"),
        "const base = <string>window.location.pathname;\nexport default base;\n",
    )
    .unwrap();

    let files = scan_project(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].source_file.ends_with("src/App.tsx"));
}

#[test]
fn unparsable_candidate_is_skipped() {
    let dir = project_with_app();
    fs::write(dir.path().join("src").join("router.js"), "const = ;\n").unwrap();

    let files = scan_project(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
}

#[test]
fn json_report_pairs_each_file_with_its_diff() {
    let dir = project_with_app();
    let builtin = RouteTable::quikdb().unwrap();
    let reports = compare_with(&builtin, scan_project(dir.path()).unwrap()).unwrap();

    let json = serde_json::to_value(&reports).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["file"]["routes"][0]["path"], "/");
    assert_eq!(entries[0]["file"]["routes"][0]["element"], "Onboarding");
    assert!(entries[0]["diff"]["extra"].as_array().unwrap().is_empty());
    assert!(entries[0]["diff"]["missing"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r == "/login (Login)"));
}

#[test]
fn unknown_element_fails_the_comparison() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("App.tsx"),
        "import Mystery from './Mystery';\ncreateBrowserRouter([{ path: \"/\", element: <Mystery /> }]);\n",
    )
    .unwrap();

    let files = scan_project(dir.path()).unwrap();
    let err = compare_with(&RouteTable::quikdb().unwrap(), files).unwrap_err();
    assert!(matches!(err, ShellError::UnknownComponent(name) if name == "Mystery"));
}

#[test]
fn empty_project_reports_no_router() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(scan_project(dir.path()), Err(ShellError::NoRouterFound(_))));
}
