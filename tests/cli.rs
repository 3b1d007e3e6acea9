mod common;

use std::process::Command;

use common::docx;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_file-preview"))
}

#[test]
fn json_output_reflects_selection() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    let picture = dir.path().join("picture.png");
    std::fs::write(&notes, "hello from cli").unwrap();
    std::fs::write(&picture, b"\x89PNG").unwrap();

    let output = bin().arg("--json").arg(&notes).arg(&picture).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let state: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(state["text_content"], "hello from cli");
    assert_eq!(state["documents"][0]["media_type"], "image/png");
    assert_eq!(state["documents"][0]["name"], "picture.png");
    assert!(state["table_content"].is_null());
}

#[test]
fn html_page_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.docx");
    let broken = dir.path().join("broken.docx");
    let page = dir.path().join("out.html");
    std::fs::write(&report, docx(&["Body &lt;text&gt;"])).unwrap();
    std::fs::write(&broken, b"nope").unwrap();

    let status = bin()
        .arg("--output")
        .arg(&page)
        .arg(&report)
        .arg(&broken)
        .status()
        .unwrap();
    assert!(status.success());

    let html = std::fs::read_to_string(&page).unwrap();
    assert!(html.contains("<h2>Upload and View Files</h2>"));
    assert!(html.contains("Body &lt;text&gt;"));
    assert!(html.contains("Failed to load DOCX file."));
}

#[test]
fn bad_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("preview.toml");
    let notes = dir.path().join("notes.txt");
    std::fs::write(&config, "page_title = 3").unwrap();
    std::fs::write(&notes, "x").unwrap();

    let status = bin().arg("--config").arg(&config).arg(&notes).status().unwrap();
    assert!(!status.success());
}
