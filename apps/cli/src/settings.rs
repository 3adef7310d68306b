use std::{collections::HashMap, fs};

#[derive(Debug)]
pub struct Settings {
    pub server_url: String,
    pub practitioner_id: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            practitioner_id: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("scan-orders.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_config(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("SCAN_ORDERS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("SCAN_ORDERS_PRACTITIONER_ID") {
        if let Ok(parsed) = v.parse::<i64>() {
            settings.practitioner_id = Some(parsed);
        }
    }

    settings
}

fn apply_file_config(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("server_url") {
        settings.server_url = v.clone();
    }
    if let Some(v) = file_cfg.get("practitioner_id") {
        if let Ok(parsed) = v.parse::<i64>() {
            settings.practitioner_id = Some(parsed);
        }
    }
}
