use std::io::Write;
use std::process::{Command, Stdio};

fn docchat() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docchat"))
}

#[test]
fn test_render_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "# Title\n**bold** & `code`").unwrap();

    let output = docchat()
        .args(["render", "--kind", "mixed"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "<h1 class=\"markdown-h1\">Title</h1><br><strong>bold</strong> &amp; <code class=\"inline-code\">code</code>\n"
    );
}

#[test]
fn test_render_stdin() {
    let mut child = docchat()
        .arg("render")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"- a\n- b")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)
        .unwrap()
        .starts_with("<ul class=\"markdown-ul\">"));
}

#[test]
fn test_render_rejects_unknown_kind() {
    let output = docchat()
        .args(["render", "--kind", "chart"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_crop_prints_request() {
    let output = docchat()
        .args(["crop", "--start", "80,100", "--end", "480,600", "--surface", "800,1000", "--page", "4"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["figure_name"], "Figure_4");
    assert_eq!(json["x"], 0.1);
}

#[test]
fn test_crop_rejects_tiny_selection() {
    let output = docchat()
        .args(["crop", "--start", "0,0", "--end", "5,5", "--surface", "800,1000", "--page", "1"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("selection too small"));
}

#[test]
fn test_ask_rejects_blank_question() {
    let output = docchat()
        .args(["ask", "doc-1", "   ", "--base-url", "http://127.0.0.1:9"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("question is empty"));
}

#[test]
fn test_upload_rejects_non_pdf() {
    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();

    let output = docchat()
        .arg("upload")
        .arg(file.path())
        .args(["--base-url", "http://127.0.0.1:9"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not a PDF file"));
}

#[test]
fn test_crop_base_url_needs_document() {
    let output = docchat()
        .args(["crop", "--start", "0,0", "--end", "400,500", "--surface", "800,1000", "--page", "1"])
        .args(["--base-url", "http://127.0.0.1:9"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}
