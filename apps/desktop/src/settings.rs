use std::{collections::HashMap, fs, path::Path};

use tracing::warn;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint_url: Option<String>,
}

/// Reads `endpoint_url` from the TOML file at `path`, then lets a value given
/// on the command line (or through `FEEDBACK_ENDPOINT_URL`) win.
pub fn load_client_settings(path: &Path, cli_endpoint: Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("endpoint_url") {
                    settings.endpoint_url = Some(v.clone());
                }
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable client config"),
        }
    }

    if let Some(v) = cli_endpoint {
        settings.endpoint_url = Some(v);
    }

    settings
}
