use super::*;

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(
        normalize_database_url("data\\responses.db"),
        "sqlite://data/responses.db"
    );
}

#[test]
fn keeps_existing_sqlite_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url(" sqlite://./data/x.db?mode=rwc "),
        "sqlite://./data/x.db?mode=rwc"
    );
}

#[test]
fn blank_database_url_falls_back_to_default() {
    assert_eq!(
        prepare_database_url("   ").expect("prepare"),
        Settings::default().database_url
    );
}

#[test]
fn rejects_non_sqlite_database_url() {
    assert!(prepare_database_url("postgres://localhost/db").is_err());
}

#[test]
fn file_settings_override_defaults() {
    let mut settings = Settings::default();
    let file_cfg = HashMap::from([
        ("bind_addr".to_string(), "0.0.0.0:9000".to_string()),
        ("database_url".to_string(), "sqlite://./x.db".to_string()),
        ("gemini_model".to_string(), "  ".to_string()),
    ]);
    apply_file_settings(&mut settings, &file_cfg);

    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.database_url, "sqlite://./x.db");
    assert_eq!(settings.gemini_model, DEFAULT_GEMINI_MODEL);
    assert!(settings.gemini_api_key.is_none());
}

#[test]
fn blank_values_are_treated_as_unset() {
    assert_eq!(non_blank("  ".into()), None);
    assert_eq!(non_blank(" key ".into()), Some("key".into()));
}
