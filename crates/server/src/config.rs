use std::{collections::HashMap, fs};

use serde::Deserialize;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/responses.db".into(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_settings(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Ok(v) = std::env::var("API_KEY") {
        settings.gemini_api_key = non_blank(v);
    }
    if let Ok(v) = std::env::var("GEMINI_API_KEY") {
        settings.gemini_api_key = non_blank(v);
    }

    if let Ok(v) = std::env::var("APP__GEMINI_MODEL") {
        if let Some(model) = non_blank(v) {
            settings.gemini_model = model;
        }
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("gemini_model") {
        if let Some(model) = non_blank(v.clone()) {
            settings.gemini_model = model;
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Turns a bare file path into a sqlite URL. Parent directories are created
/// by `Storage::new`.
pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    if database_url.contains("://") && !database_url.starts_with("sqlite://") {
        anyhow::bail!("unsupported database url '{database_url}', only sqlite is supported");
    }
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
