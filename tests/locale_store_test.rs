use std::path::PathBuf;

use repo_bot::locale::LocaleError;
use repo_bot::locale::LocaleStore;
use repo_bot::locale::MessageFormatter;

mod common;

const EN: &str = r#"{
    "errors": {
        "no_private_message": "Server only.",
        "command_on_cooldown": "Wait {0}s."
    }
}"#;

const FR: &str = r#"{
    "errors": {
        "no_private_message": "Serveur uniquement."
    }
}"#;

#[test]
fn test_load_and_lookup() {
    let dir = common::setup_locale_dir(&[("en", EN), ("fr", FR)]);

    let store = LocaleStore::load(&dir, "en").expect("Failed to load locale store");
    assert_eq!(
        store.get("fr").get("errors.no_private_message"),
        Some("Serveur uniquement.")
    );
    assert_eq!(
        store.get("en").get("errors.no_private_message"),
        Some("Server only.")
    );

    common::teardown_locale_dir(dir);
}

#[test]
fn test_unknown_locale_falls_back_to_default() {
    let dir = common::setup_locale_dir(&[("en", EN), ("fr", FR)]);

    let store = LocaleStore::load(&dir, "en").expect("Failed to load locale store");
    assert_eq!(store.get("de").name(), "en");

    common::teardown_locale_dir(dir);
}

#[test]
fn test_missing_default_locale_is_an_error() {
    let dir = common::setup_locale_dir(&[("en", EN)]);

    let result = LocaleStore::load(&dir, "de");
    match result.unwrap_err() {
        LocaleError::MissingDefaultLocale { name } => assert_eq!(name, "de"),
        other => panic!("Expected MissingDefaultLocale, got {other:?}"),
    }

    common::teardown_locale_dir(dir);
}

#[test]
fn test_missing_directory_is_an_io_error() {
    let dir = std::env::temp_dir().join("repo-bot-test-does-not-exist");
    let result = LocaleStore::load(&dir, "en");
    assert!(matches!(result.unwrap_err(), LocaleError::Io { .. }));
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let dir = common::setup_locale_dir(&[("en", "{ not json")]);

    let result = LocaleStore::load(&dir, "en");
    assert!(matches!(result.unwrap_err(), LocaleError::Parse { .. }));

    common::teardown_locale_dir(dir);
}

#[test]
fn test_formatter_over_store_default() {
    let dir = common::setup_locale_dir(&[("en", EN)]);

    let store = LocaleStore::load(&dir, "en").expect("Failed to load locale store");
    let mut fmt = MessageFormatter::new(store.default_locale());
    fmt.set_prefix("errors");
    assert_eq!(fmt.fmt("command_on_cooldown", &["2.00"]), "Wait 2.00s.");

    common::teardown_locale_dir(dir);
}

#[test]
fn test_shipped_catalog_covers_the_error_taxonomy() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("locales");
    let store = LocaleStore::load(&dir, "en").expect("Failed to load shipped catalog");

    let locale = store.default_locale();
    for key in [
        "errors.missing_required_argument",
        "errors.command_on_cooldown",
        "errors.max_concurrency_reached",
        "errors.bot_missing_permissions",
        "errors.missing_permissions",
        "errors.no_private_message",
        "errors.command_not_found.title",
        "errors.command_not_found.description",
        "errors.command_not_found.footer",
    ] {
        assert!(
            locale.get(key).is_some(),
            "Shipped en catalog is missing \"{key}\""
        );
    }
}
