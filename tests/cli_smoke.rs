use std::path::Path;
use std::process::{Command, Output, Stdio};

fn fixture(root: &Path) {
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("a.go"), "package a\n").unwrap();
    std::fs::write(root.join("a_test.go"), "package a\n").unwrap();
    std::fs::write(root.join("b.txt"), "notes").unwrap();
    std::fs::write(root.join("logo.png"), b"\x89PNG\r\n\x1a\n\0\0\0\0").unwrap();
    std::fs::write(root.join("src/lib.rs"), "pub fn f() {}\n").unwrap();
}

fn run(root: &Path, args: &[&str]) -> Output {
    // `cargo test` sets this for integration tests.
    let bin = env!("CARGO_BIN_EXE_contextpack");
    Command::new(bin)
        .arg("--root")
        .arg(root)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("spawn contextpack")
}

#[test]
fn packs_selected_files_in_path_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    fixture(tmp.path());

    let out = run(tmp.path(), &["-i", "*.go", "-i", "*.png", "-x", "*_test.go"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).expect("utf-8 context");
    assert_eq!(
        stdout,
        "<file path=\"a.go\">\npackage a\n</file>\n\n\
         <file path=\"logo.png\">\n[Binary file: 12 bytes, type: image/png]\n</file>\n\n"
    );
}

#[test]
fn default_selection_skips_directories() {
    let tmp = tempfile::TempDir::new().unwrap();
    fixture(tmp.path());

    let out = run(tmp.path(), &["--meta"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is json");
    let paths: Vec<&str> = v["paths"]
        .as_array()
        .expect("paths array")
        .iter()
        .filter_map(|p| p.as_str())
        .collect();
    assert_eq!(paths, vec!["a.go", "a_test.go", "b.txt", "logo.png"]);
    assert_eq!(v["files"], 4);
    assert_eq!(v["limits"]["max_file_count"], 50);
}

#[test]
fn config_file_limits_apply() {
    let tmp = tempfile::TempDir::new().unwrap();
    fixture(tmp.path());
    std::fs::write(
        tmp.path().join(".contextpack.json"),
        r#"{"limits": {"max_file_size": 3}, "selectors": {"include": ["b.txt"]}}"#,
    )
    .unwrap();

    let out = run(tmp.path(), &[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "<file path=\"b.txt\">\nnot\n\n[... truncated ...]\n</file>\n\n"
    );
}

#[test]
fn file_count_budget_fails_without_output() {
    let tmp = tempfile::TempDir::new().unwrap();
    fixture(tmp.path());

    let out = run(tmp.path(), &["-i", "*.go", "--max-files", "1"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty(), "no partial context on failure");

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("context too large: 2 files exceeds limit of 1"), "{stderr}");
}

#[test]
fn writes_output_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    fixture(tmp.path());
    let dest = tmp.path().join("out.txt");

    let out = run(
        tmp.path(),
        &["-i", "src/*.rs", "-o", dest.to_str().unwrap()],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&dest).unwrap(),
        "<file path=\"src/lib.rs\">\npub fn f() {}\n</file>\n\n"
    );
}

#[test]
fn dot_root_packs_working_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    fixture(tmp.path());

    let out = Command::new(env!("CARGO_BIN_EXE_contextpack"))
        .current_dir(tmp.path())
        .args(["--root", ".", "-i", "*.go", "-x", "*_test.go"])
        .stdin(Stdio::null())
        .output()
        .expect("spawn contextpack");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "<file path=\"a.go\">\npackage a\n</file>\n\n"
    );
}

#[test]
fn exclude_flags_extend_config_excludes() {
    let tmp = tempfile::TempDir::new().unwrap();
    fixture(tmp.path());
    std::fs::write(
        tmp.path().join(".contextpack.json"),
        r#"{"selectors": {"exclude": ["*.png", ".contextpack.json"]}}"#,
    )
    .unwrap();

    let out = run(tmp.path(), &["--meta", "-x", "*_test.go"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is json");
    let paths: Vec<&str> = v["paths"]
        .as_array()
        .expect("paths array")
        .iter()
        .filter_map(|p| p.as_str())
        .collect();
    assert_eq!(paths, vec!["a.go", "b.txt"]);
}
