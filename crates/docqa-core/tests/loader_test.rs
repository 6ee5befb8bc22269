use docqa_config::DocumentsConfig;
use docqa_core::loader::load_documents;
use std::fs;
use tempfile::TempDir;

fn corpus() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.txt"), "Berlin is the capital of Germany").unwrap();
    fs::write(dir.path().join("a.txt"), "Paris is the capital of France").unwrap();
    fs::write(dir.path().join("blank.txt"), "   \n\t ").unwrap();
    fs::write(dir.path().join("notes.md"), "# not a txt file").unwrap();
    fs::write(dir.path().join("binary.txt"), [0xff, 0xfe, 0x00, 0x81]).unwrap();
    fs::create_dir(dir.path().join("tech")).unwrap();
    fs::write(dir.path().join("tech").join("c.txt"), "Rust is a systems language").unwrap();
    dir
}

#[test]
fn loads_top_level_txt_sorted() {
    let dir = corpus();
    let loaded = load_documents(dir.path(), &DocumentsConfig::default()).unwrap();

    let ids: Vec<&str> = loaded.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a.txt", "b.txt"]);
    assert_eq!(loaded.documents[0].text, "Paris is the capital of France");
}

#[test]
fn invalid_utf8_is_reported_not_fatal() {
    let dir = corpus();
    let loaded = load_documents(dir.path(), &DocumentsConfig::default()).unwrap();

    assert_eq!(loaded.failures.len(), 1);
    assert!(loaded.failures[0].path.ends_with("binary.txt"));
}

#[test]
fn recursive_uses_relative_ids() {
    let dir = corpus();
    let config = DocumentsConfig {
        recursive: true,
        ..Default::default()
    };
    let loaded = load_documents(dir.path(), &config).unwrap();

    let ids: Vec<&str> = loaded.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a.txt", "b.txt", "tech/c.txt"]);
}

#[test]
fn custom_extension() {
    let dir = corpus();
    let config = DocumentsConfig {
        extension: "md".to_string(),
        ..Default::default()
    };
    let loaded = load_documents(dir.path(), &config).unwrap();
    assert_eq!(loaded.documents.len(), 1);
    assert_eq!(loaded.documents[0].id, "notes.md");
}

#[test]
fn hidden_and_gitignored_files_are_loaded() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".gitignore"), "draft*.txt\n").unwrap();
    fs::write(dir.path().join(".ignore"), "a.txt\n").unwrap();
    fs::write(dir.path().join("a.txt"), "Paris is the capital of France").unwrap();
    fs::write(dir.path().join(".notes.txt"), "hidden but still a document").unwrap();
    fs::write(dir.path().join("draft1.txt"), "ignored by git, not by us").unwrap();

    let loaded = load_documents(dir.path(), &DocumentsConfig::default()).unwrap();

    let ids: Vec<&str> = loaded.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec![".notes.txt", "a.txt", "draft1.txt"]);
    assert!(loaded.failures.is_empty());
}
