use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use iced::Theme;
use serde::{Deserialize, Serialize};

use crate::push::ANNOUNCEMENTS;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme_name: String,
    pub api_base_url: String,
    /// Server-Sent Events endpoint. Live refresh is off when unset.
    pub push_url: Option<String>,
    pub push_retry_secs: u64,
    pub refresh_resource: String,
    pub announcements_page_size: usize,
    pub grade_id: Option<String>,
    pub first_name: Option<String>,
    /// Never written back to disk, only read from the environment.
    #[serde(skip)]
    pub access_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_name: "Light".to_string(),
            api_base_url: "http://localhost:3001".to_string(),
            push_url: None,
            push_retry_secs: 5,
            refresh_resource: ANNOUNCEMENTS.to_string(),
            announcements_page_size: 3,
            grade_id: None,
            first_name: None,
            access_key: None,
        }
    }
}

impl Config {
    pub fn theme(&self) -> Theme {
        theme_from_str(&self.theme_name).unwrap_or(Theme::Light)
    }

    /// Overrides file settings with `PORTAL_*` variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PORTAL_API_URL") {
            self.api_base_url = url;
        }
        if let Some(url) = lookup("PORTAL_PUSH_URL") {
            self.push_url = Some(url).filter(|url| !url.trim().is_empty());
        }
        if let Some(grade_id) = lookup("PORTAL_GRADE_ID") {
            self.grade_id = Some(grade_id);
        }
        if let Some(first_name) = lookup("PORTAL_FIRST_NAME") {
            self.first_name = Some(first_name);
        }
        if let Some(key) = lookup("PORTAL_ACCESS_KEY") {
            self.access_key = Some(key);
        }
        if let Some(size) = lookup("PORTAL_PAGE_SIZE").and_then(|v| v.parse::<usize>().ok()) {
            self.announcements_page_size = size;
        }
        self.announcements_page_size = self.announcements_page_size.max(1);
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Reads `config.json` and applies environment overrides. A broken file falls back to defaults.
pub fn load_config() -> Config {
    let mut config = match load_config_from(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "Using default configuration");
            Config::default()
        }
    };
    config.apply_env(|key| std::env::var(key).ok());
    config
}

pub fn save_config(config: &Config) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(CONFIG_FILE, json)?;
    Ok(())
}

pub fn theme_from_str(name: &str) -> Option<Theme> {
    Theme::ALL
        .iter()
        .find(|t| theme_to_str(t).eq_ignore_ascii_case(name))
        .cloned()
}

pub fn theme_to_str(theme: &Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
        Theme::Dracula => "Dracula",
        Theme::Nord => "Nord",
        Theme::SolarizedLight => "SolarizedLight",
        Theme::SolarizedDark => "SolarizedDark",
        Theme::GruvboxLight => "GruvboxLight",
        Theme::GruvboxDark => "GruvboxDark",
        Theme::CatppuccinLatte => "CatppuccinLatte",
        Theme::CatppuccinFrappe => "CatppuccinFrappe",
        Theme::CatppuccinMacchiato => "CatppuccinMacchiato",
        Theme::CatppuccinMocha => "CatppuccinMocha",
        Theme::TokyoNight => "TokyoNight",
        Theme::TokyoNightStorm => "TokyoNightStorm",
        Theme::TokyoNightLight => "TokyoNightLight",
        Theme::KanagawaWave => "KanagawaWave",
        Theme::KanagawaDragon => "KanagawaDragon",
        Theme::KanagawaLotus => "KanagawaLotus",
        Theme::Moonfly => "Moonfly",
        Theme::Nightfly => "Nightfly",
        Theme::Oxocarbon => "Oxocarbon",
        Theme::Ferra => "Ferra",
        _ => "Unknown",
    }
}
