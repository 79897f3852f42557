use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

/// Creates a unique temp directory holding one catalog file per
/// `(locale_name, json)` pair.
pub fn setup_locale_dir(files: &[(&str, &str)]) -> PathBuf {
    let uuid = Uuid::new_v4();
    let dir = std::env::temp_dir().join(format!("repo-bot-test-{}", uuid));
    fs::create_dir_all(&dir).expect("Failed to create locale dir");

    for (name, contents) in files {
        fs::write(dir.join(format!("{name}.json")), contents)
            .expect("Failed to write locale file");
    }

    dir
}

pub fn teardown_locale_dir(dir: PathBuf) {
    if dir.exists() {
        let _ = fs::remove_dir_all(dir);
    }
}
